//! stagecrew-server: HTTP front door for the production crew.
//!
//! `GET /` is a health check. `POST /trigger-crew` assembles the crew for a
//! production, runs it through the configured engine and returns the result
//! with its wall-clock duration.

pub mod config;
pub mod error;
pub mod web;
