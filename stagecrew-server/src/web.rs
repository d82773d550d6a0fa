//! REST API: health check and crew trigger.
//!
//! Requests are independent. Shared state is read-only apart from the run
//! semaphore, which caps how many crews execute at once.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tower_http::cors::CorsLayer;

use stagecrew_agents::crew::{self, Crew, CrewInputs};
use stagecrew_agents::engine::CrewEngine;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// State shared by every handler.
pub struct AppState {
    pub config: ServerConfig,
    pub engine: Arc<dyn CrewEngine>,
    runs: Semaphore,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: Arc<dyn CrewEngine>) -> Self {
        let permits = match config.max_concurrent_runs {
            0 => Semaphore::MAX_PERMITS,
            n => n,
        };
        Self {
            config,
            engine,
            runs: Semaphore::new(permits),
        }
    }
}

/// Build the axum router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/trigger-crew", post(trigger_crew))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CrewRequest {
    pub production_name: String,
    #[serde(default)]
    pub additional_context: CrewInputs,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CrewResponse {
    pub result: String,
    /// Wall-clock seconds spent inside the engine.
    pub execution_time: f64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Musical Theater CrewAI API is running",
    })
}

async fn trigger_crew(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CrewRequest>, JsonRejection>,
) -> Result<Json<CrewResponse>, ApiError> {
    // Configuration is checked before the body is looked at.
    let missing = state.config.missing_keys();
    if !missing.is_empty() {
        let err = ApiError::MissingConfig(missing);
        tracing::error!("{err}");
        return Err(err);
    }
    let Json(req) = body?;

    tracing::info!(production = %req.production_name, "Received request for production");

    match run_crew(&state, &req).await {
        Ok(resp) => {
            tracing::info!(
                production = %req.production_name,
                "CrewAI execution completed in {:.2} seconds",
                resp.execution_time
            );
            Ok(Json(resp))
        }
        Err(err) => {
            match &err {
                ApiError::Execution(cause) => {
                    tracing::error!(production = %req.production_name, "Error during CrewAI execution: {cause:?}")
                }
                other => tracing::error!(production = %req.production_name, "{other}"),
            }
            Err(err)
        }
    }
}

async fn run_crew(state: &AppState, req: &CrewRequest) -> Result<CrewResponse, ApiError> {
    let crew = Crew::for_production(&req.production_name);
    let inputs = crew::kickoff_inputs(&req.production_name, &req.additional_context);

    let _permit = state
        .runs
        .acquire()
        .await
        .map_err(|e| ApiError::Execution(e.into()))?;

    let start = Instant::now();
    let run = state.engine.kickoff(&crew, &inputs);
    let output = match state.config.run_timeout() {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| ApiError::Timeout(limit))?,
        None => run.await,
    }
    .map_err(ApiError::Execution)?;

    Ok(CrewResponse {
        result: output.raw,
        execution_time: start.elapsed().as_secs_f64(),
    })
}
