//! Sequential crew engine. Runs every task in order through the LLM.
//!
//! Each task is one completion. The agent's role, goal and backstory form
//! the system prompt; the task, the run inputs and all earlier task outputs
//! form the user prompt. The last task's output is the crew's answer.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::crew::{self, AgentDescriptor, Crew, CrewInputs, Process, TaskInstance};
use crate::engine::{CrewEngine, CrewOutput, TaskOutput, TokenUsage};
use crate::llm::LlmClient;

pub struct SequentialEngine {
    llm: LlmClient,
}

impl SequentialEngine {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn run_task(
        &self,
        crew: &Crew,
        task: &TaskInstance,
        inputs: &CrewInputs,
        prior: &[TaskOutput],
    ) -> Result<(TaskOutput, TokenUsage)> {
        let system = system_prompt(crew, &task.agent, inputs);
        let prompt = task_prompt(task, inputs, prior);
        let completion = self
            .llm
            .complete(&system, &prompt)
            .await
            .with_context(|| format!("{} failed task '{}'", task.agent.role, task.description))?;

        let output = TaskOutput {
            agent: task.agent.role.clone(),
            description: task.description.clone(),
            raw: completion.text,
        };
        Ok((output, completion.usage))
    }
}

#[async_trait]
impl CrewEngine for SequentialEngine {
    async fn kickoff(&self, crew: &Crew, inputs: &CrewInputs) -> Result<CrewOutput> {
        let Process::Sequential = crew.process;
        if crew.tasks.is_empty() {
            anyhow::bail!("Crew for '{}' has no tasks", crew.production_name);
        }

        tracing::info!(
            production = %crew.production_name,
            agents = crew.agents.len(),
            tasks = crew.tasks.len(),
            model = %self.llm.model(),
            "Crew kickoff"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(crew.tasks.len());
        let mut usage = TokenUsage::default();

        for (i, task) in crew.tasks.iter().enumerate() {
            let started = Instant::now();
            let (output, task_usage) = self.run_task(crew, task, inputs, &outputs).await?;
            usage.prompt_tokens += task_usage.prompt_tokens;
            usage.completion_tokens += task_usage.completion_tokens;

            if crew.verbose && task.agent.verbose {
                tracing::info!(
                    step = i + 1,
                    of = crew.tasks.len(),
                    agent = %task.agent.role,
                    task = %task.description,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Task complete"
                );
            } else {
                tracing::debug!(step = i + 1, agent = %task.agent.role, "Task complete");
            }
            outputs.push(output);
        }

        tracing::info!(total_tokens = usage.total(), "Crew finished");

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
            token_usage: usage,
        })
    }
}

/// System prompt for one agent: who it is, what it wants, who it works with.
pub fn system_prompt(crew: &Crew, agent: &AgentDescriptor, inputs: &CrewInputs) -> String {
    let mut prompt = format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.role,
        crew::interpolate(&agent.backstory, inputs),
        crew::interpolate(&agent.goal, inputs),
    );

    if agent.allow_delegation {
        let coworkers: Vec<&str> = crew.coworkers_of(&agent.role).collect();
        if !coworkers.is_empty() {
            prompt.push_str(&format!(
                "\n\nYou are part of a production team with: {}. Build on their work, \
                 and when a question belongs to a coworker's specialty, say what you \
                 would hand over to them.",
                coworkers.join(", ")
            ));
        }
    }
    prompt
}

/// User prompt for one task, carrying the run inputs and earlier outputs.
pub fn task_prompt(task: &TaskInstance, inputs: &CrewInputs, prior: &[TaskOutput]) -> String {
    let mut prompt = String::new();

    if !inputs.is_empty() {
        prompt.push_str("Production inputs:\n");
        for (key, value) in inputs {
            prompt.push_str(&format!("- {key}: {}\n", crew::input_text(value)));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n",
        crew::interpolate(&task.description, inputs),
        crew::interpolate(&task.expected_output, inputs),
    ));

    if !prior.is_empty() {
        prompt.push_str("\nThis is the context you're working with:\n");
        for out in prior {
            prompt.push_str(&format!(
                "\n--- {}: {}\n{}\n",
                out.agent, out.description, out.raw
            ));
        }
    }
    prompt
}
