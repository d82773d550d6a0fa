//! stagecrew: inspect or run the production crew from a terminal.
//!
//!   stagecrew roster [--json]                      Show agents and tasks
//!   stagecrew kickoff <production> [-c key=value]  Run the crew locally
//!
//! `kickoff` requires OPENAI_API_KEY.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use stagecrew_agents::crew::{self, Crew, CrewInputs};
use stagecrew_agents::engine::CrewEngine;
use stagecrew_agents::llm::{DEFAULT_API_BASE, DEFAULT_MODEL, LlmClient};
use stagecrew_agents::sequential::SequentialEngine;

#[derive(Parser)]
#[command(name = "stagecrew", about = "Musical theater production crew")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the agents and tasks assembled for a production
    Roster {
        /// Production name
        #[arg(default_value = "New Musical Production")]
        production: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run every task of the crew and print the final result
    Kickoff {
        /// Production name
        production: String,

        /// Extra context passed to the crew as key=value (repeatable)
        #[arg(short, long = "context", value_parser = parse_context)]
        context: Vec<(String, String)>,

        /// Model to use
        #[arg(long, env = "OPENAI_MODEL_NAME", default_value = DEFAULT_MODEL)]
        model: String,

        /// OpenAI-compatible API base URL
        #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,

        /// API key (or set OPENAI_API_KEY env var)
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Only log crew start and finish, not every task
        #[arg(short, long)]
        quiet: bool,
    },
}

fn parse_context(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stagecrew_agents=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Roster { production, json } => {
            let crew = Crew::for_production(&production);
            if json {
                println!("{}", serde_json::to_string_pretty(&crew)?);
            } else {
                print_roster(&crew);
            }
        }
        Command::Kickoff {
            production,
            context,
            model,
            api_base,
            api_key,
            quiet,
        } => {
            let llm = LlmClient::new(api_key)
                .with_model(&model)
                .with_api_base(&api_base);
            let engine = SequentialEngine::new(llm);

            let extra: CrewInputs = context
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let mut crew = Crew::for_production(&production);
            crew.verbose = !quiet;
            let inputs = crew::kickoff_inputs(&production, &extra);

            let start = Instant::now();
            let output = engine
                .kickoff(&crew, &inputs)
                .await
                .context("Crew run failed")?;
            let elapsed = start.elapsed().as_secs_f64();

            println!("{}", output.raw);
            eprintln!("Completed in {elapsed:.2}s ({} tokens)", output.token_usage.total());
        }
    }

    Ok(())
}

fn print_roster(crew: &Crew) {
    println!("Production: {}", crew.production_name);
    for agent in &crew.agents {
        println!("\n[{}] {}", agent.role, agent.goal);
        for task in crew.tasks_for(agent) {
            println!("  - {} -> {}", task.description, task.expected_output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context() {
        assert_eq!(
            parse_context("setting=Paris, 1920").unwrap(),
            ("setting".to_string(), "Paris, 1920".to_string())
        );
        assert_eq!(parse_context("a=b=c").unwrap().1, "b=c");
        assert!(parse_context("novalue").is_err());
        assert!(parse_context("=x").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from(["stagecrew", "roster", "Test Show", "--json"]).unwrap();
        assert!(matches!(args.command, Command::Roster { json: true, .. }));

        let args = Args::try_parse_from([
            "stagecrew", "kickoff", "Test Show", "-c", "acts=2", "--api-key", "k", "-q",
        ])
        .unwrap();
        match args.command {
            Command::Kickoff { production, context, quiet, .. } => {
                assert!(quiet);
                assert_eq!(production, "Test Show");
                assert_eq!(context, vec![("acts".to_string(), "2".to_string())]);
            }
            _ => panic!("expected kickoff"),
        }
    }
}
