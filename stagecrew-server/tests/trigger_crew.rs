//! HTTP API acceptance tests.
//!
//! Drives the router in-process with stub engines: health check, missing
//! configuration, successful runs, engine failures, timeouts and the
//! concurrency cap.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use stagecrew_agents::crew::{Crew, CrewInputs};
use stagecrew_agents::engine::{CrewEngine, CrewOutput};
use stagecrew_server::config::ServerConfig;
use stagecrew_server::web::{self, AppState};

/// Returns a fixed result and records what it was asked to run.
#[derive(Default)]
struct StubEngine {
    result: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<(usize, usize, CrewInputs)>>,
}

impl StubEngine {
    fn returning(result: &str) -> Arc<Self> {
        Arc::new(Self {
            result: result.to_string(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl CrewEngine for StubEngine {
    async fn kickoff(&self, crew: &Crew, inputs: &CrewInputs) -> anyhow::Result<CrewOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .await
            .push((crew.agents.len(), crew.tasks.len(), inputs.clone()));
        Ok(CrewOutput::from_raw(self.result.clone()))
    }
}

struct FailingEngine;

#[async_trait]
impl CrewEngine for FailingEngine {
    async fn kickoff(&self, _crew: &Crew, _inputs: &CrewInputs) -> anyhow::Result<CrewOutput> {
        let cause = anyhow::anyhow!("model quota exhausted");
        Err(cause.context("Director failed task 'Staging concepts'"))
    }
}

/// Sleeps before answering, tracking how many runs overlap.
#[derive(Default)]
struct SlowEngine {
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl CrewEngine for SlowEngine {
    async fn kickoff(&self, _crew: &Crew, _inputs: &CrewInputs) -> anyhow::Result<CrewOutput> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(CrewOutput::from_raw("done"))
    }
}

fn configured() -> ServerConfig {
    ServerConfig {
        openai_api_key: Some("sk-test".to_string()),
        ..Default::default()
    }
}

fn app(config: ServerConfig, engine: Arc<dyn CrewEngine>) -> axum::Router {
    web::router(Arc::new(AppState::new(config, engine)))
}

fn trigger(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/trigger-crew")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// ── Health ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_ok_without_config() {
    let app = app(ServerConfig::default(), StubEngine::returning("OK"));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Musical Theater CrewAI API is running");
}

// ── Preconditions ───────────────────────────────────────────────────────

#[tokio::test]
async fn missing_api_key_is_500_naming_the_key() {
    let engine = StubEngine::returning("OK");
    let app = app(ServerConfig::default(), engine.clone());
    let response = app
        .oneshot(trigger(r#"{"production_name": "Test Show"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("OPENAI_API_KEY"), "{detail}");
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_api_key_wins_over_bad_body() {
    let engine = StubEngine::returning("OK");
    let app = app(ServerConfig::default(), engine.clone());
    let response = app
        .oneshot(trigger(r#"{"additional_context": {}}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("OPENAI_API_KEY"));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_body_never_reaches_engine() {
    let engine = StubEngine::returning("OK");
    let app = app(configured(), engine.clone());
    let response = app
        .oneshot(trigger(r#"{"additional_context": {}}"#))
        .await
        .unwrap();
    assert!(response.status().is_client_error(), "{}", response.status());
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("production_name"));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

// ── Runs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_run_returns_result_and_time() {
    let engine = StubEngine::returning("OK");
    let app = app(configured(), engine.clone());
    let response = app
        .oneshot(trigger(r#"{"production_name": "Test Show"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"], "OK");
    assert!(body["execution_time"].as_f64().unwrap() >= 0.0);

    let seen = engine.seen.lock().await;
    let (agents, tasks, inputs) = &seen[0];
    assert_eq!((*agents, *tasks), (7, 21));
    assert_eq!(inputs["production_name"], "Test Show");
    assert_eq!(inputs.len(), 1);
}

#[tokio::test]
async fn additional_context_is_forwarded() {
    let engine = StubEngine::returning("OK");
    let app = app(configured(), engine.clone());
    let body = json!({
        "production_name": "Test Show",
        "additional_context": {"setting": "1920s Paris", "acts": 2}
    });
    let response = app.oneshot(trigger(&body.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let seen = engine.seen.lock().await;
    let (agents, tasks, inputs) = &seen[0];
    assert_eq!((*agents, *tasks), (7, 21));
    assert_eq!(inputs["production_name"], "Test Show");
    assert_eq!(inputs["setting"], "1920s Paris");
    assert_eq!(inputs["acts"], 2);
}

#[tokio::test]
async fn engine_error_is_500_with_message() {
    let app = app(configured(), Arc::new(FailingEngine));
    let response = app
        .oneshot(trigger(r#"{"production_name": "Test Show"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("An error occurred during CrewAI execution"), "{detail}");
    assert!(detail.contains("model quota exhausted"), "{detail}");
}

#[tokio::test]
async fn run_timeout_is_500() {
    let engine = Arc::new(SlowEngine {
        delay: Duration::from_secs(5),
        ..Default::default()
    });
    let config = ServerConfig {
        run_timeout_secs: 1,
        ..configured()
    };
    let app = app(config, engine);
    let response = app
        .oneshot(trigger(r#"{"production_name": "Test Show"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("1s timeout"));
}

#[tokio::test]
async fn concurrent_runs_respect_cap() {
    let engine = Arc::new(SlowEngine {
        delay: Duration::from_millis(100),
        ..Default::default()
    });
    let config = ServerConfig {
        max_concurrent_runs: 2,
        ..configured()
    };
    let app = app(config, engine.clone());

    let mut handles = Vec::new();
    for i in 0..6 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = json!({"production_name": format!("Show {i}")}).to_string();
            app.oneshot(trigger(&body)).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(engine.peak.load(Ordering::SeqCst), 2);
}
