//! Server configuration, parsed once at start-up from flags and environment.

use std::time::Duration;

use clap::Parser;
use stagecrew_agents::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};

#[derive(Debug, Clone, Parser)]
#[command(name = "stagecrew-server", about = "Musical Theater crew API")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "STAGECREW_LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// LLM provider API key. The server starts without it, but crew runs
    /// are refused until it is set.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model every agent uses
    #[arg(long, env = "OPENAI_MODEL_NAME", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Crew runs allowed at once; further requests wait. 0 = unbounded.
    #[arg(long, env = "STAGECREW_MAX_CONCURRENT_RUNS", default_value_t = 4)]
    pub max_concurrent_runs: usize,

    /// Abort a crew run after this many seconds. 0 = never.
    #[arg(long, env = "STAGECREW_RUN_TIMEOUT_SECS", default_value_t = 900)]
    pub run_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_concurrent_runs: 4,
            run_timeout_secs: 900,
        }
    }
}

impl ServerConfig {
    /// Environment variables a crew run needs that are unset or empty.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.as_deref().is_none_or(str::is_empty) {
            missing.push("OPENAI_API_KEY");
        }
        missing
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }
}
