//! The engine seam: whatever executes a crew implements [`CrewEngine`].

use async_trait::async_trait;
use serde::Serialize;

use crate::crew::{Crew, CrewInputs};

/// Output of a single task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutput {
    /// Role of the agent that produced it.
    pub agent: String,
    pub description: String,
    pub raw: String,
}

/// Output of a whole crew run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrewOutput {
    /// Final answer of the run: the last task's output.
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage: TokenUsage,
}

impl CrewOutput {
    /// A result with no per-task breakdown.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Executes every task of a crew and returns the final result.
#[async_trait]
pub trait CrewEngine: Send + Sync {
    async fn kickoff(&self, crew: &Crew, inputs: &CrewInputs) -> anyhow::Result<CrewOutput>;
}
