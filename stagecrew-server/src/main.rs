use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stagecrew_agents::llm::LlmClient;
use stagecrew_agents::sequential::SequentialEngine;
use stagecrew_server::config::ServerConfig;
use stagecrew_server::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Use JSON logs in production (STAGECREW_LOG_JSON=1), human-readable otherwise
    let json_logs = std::env::var("STAGECREW_LOG_JSON").unwrap_or_default() == "1";
    let filter = EnvFilter::from_default_env()
        .add_directive("stagecrew_server=info".parse()?)
        .add_directive("stagecrew_agents=info".parse()?);
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }

    let config = ServerConfig::parse();
    let missing = config.missing_keys();
    if !missing.is_empty() {
        tracing::warn!(
            "Missing required environment variables: {}; /trigger-crew will fail until set",
            missing.join(", ")
        );
    }

    let llm = LlmClient::new(config.openai_api_key.clone().unwrap_or_default())
        .with_model(&config.model)
        .with_api_base(&config.api_base);
    let engine = Arc::new(SequentialEngine::new(llm));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(
        model = %config.model,
        max_concurrent_runs = config.max_concurrent_runs,
        "HTTP API listening on {}",
        listener.local_addr()?
    );

    let state = Arc::new(AppState::new(config, engine));
    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {e}");
    }
    tracing::info!("Shutting down");
}
