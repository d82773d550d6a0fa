//! stagecrew-agents: the production crew for a new musical.
//!
//! Seven creative roles, each with a short list of canned tasks, assembled
//! into a crew and run in order by a [`CrewEngine`](engine::CrewEngine):
//! - Composer + Lyricist, Book, Director, Choreographer
//! - Set/Visual, Dramaturg, Market/Producer

pub mod roster;
pub mod crew;
pub mod engine;
pub mod llm;
pub mod sequential;
