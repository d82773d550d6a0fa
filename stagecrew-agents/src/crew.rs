//! Crew assembly — binds the roster tables into agents and tasks for one run.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::roster::{self, Role, TaskTemplate};

/// Run-time inputs handed to the engine alongside the crew.
pub type CrewInputs = Map<String, Value>;

/// One role's agent configuration for a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDescriptor {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub verbose: bool,
    pub allow_delegation: bool,
}

impl AgentDescriptor {
    pub fn for_role(role: Role) -> Self {
        Self::for_role_name(role.name())
    }

    /// Build a descriptor for any role name. Names outside the roster get
    /// the generic profile.
    pub fn for_role_name(name: &str) -> Self {
        let profile = roster::profile_for_name(name);
        Self {
            role: name.to_string(),
            goal: profile.goal.to_string(),
            backstory: profile.backstory.to_string(),
            verbose: true,
            allow_delegation: true,
        }
    }
}

/// A task template bound to the agent that will perform it.
#[derive(Debug, Clone, Serialize)]
pub struct TaskInstance {
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<AgentDescriptor>,
}

impl TaskInstance {
    pub fn new(agent: Arc<AgentDescriptor>, template: &TaskTemplate) -> Self {
        Self {
            description: template.description.to_string(),
            expected_output: template.expected_output.to_string(),
            agent,
        }
    }
}

/// How the engine walks the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// Tasks run one after another in list order.
    Sequential,
}

/// Agents, tasks and process for one production run.
#[derive(Debug, Clone, Serialize)]
pub struct Crew {
    pub production_name: String,
    pub agents: Vec<Arc<AgentDescriptor>>,
    pub tasks: Vec<TaskInstance>,
    pub process: Process,
    pub verbose: bool,
}

impl Crew {
    /// Assemble the full production crew.
    ///
    /// Every role in [`Role::ALL`] gets one agent, and its templates become
    /// tasks in declared order. The production name does not change which
    /// agents or tasks exist.
    pub fn for_production(production_name: &str) -> Self {
        Self::from_role_names(production_name, Role::ALL.iter().map(|r| r.name()))
    }

    /// Assemble a crew from arbitrary role names, in the given order.
    pub fn from_role_names<'a>(
        production_name: &str,
        roles: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut agents = Vec::new();
        let mut tasks = Vec::new();

        for name in roles {
            let agent = Arc::new(AgentDescriptor::for_role_name(name));
            for template in roster::templates_for_name(name) {
                tasks.push(TaskInstance::new(agent.clone(), template));
            }
            agents.push(agent);
        }

        Self {
            production_name: production_name.to_string(),
            agents,
            tasks,
            process: Process::Sequential,
            verbose: true,
        }
    }

    /// Tasks assigned to the given agent, in run order.
    pub fn tasks_for<'a>(
        &'a self,
        agent: &'a Arc<AgentDescriptor>,
    ) -> impl Iterator<Item = &'a TaskInstance> {
        self.tasks.iter().filter(move |t| Arc::ptr_eq(&t.agent, agent))
    }

    /// Roles other than `role`, for delegation prompts.
    pub fn coworkers_of<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a str> {
        self.agents
            .iter()
            .map(|a| a.role.as_str())
            .filter(move |r| *r != role)
    }
}

/// Merge the production name and caller context into one input map.
///
/// `production_name` is inserted first, so a context entry with the same
/// key replaces it.
pub fn kickoff_inputs(production_name: &str, additional_context: &CrewInputs) -> CrewInputs {
    let mut inputs = CrewInputs::new();
    inputs.insert(
        "production_name".to_string(),
        Value::String(production_name.to_string()),
    );
    for (key, value) in additional_context {
        inputs.insert(key.clone(), value.clone());
    }
    inputs
}

/// Replace `{key}` placeholders with input values in a single pass.
/// Unknown placeholders are left as written, and substituted text is never
/// scanned again.
pub fn interpolate(template: &str, inputs: &CrewInputs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']).filter(|&i| after.as_bytes()[i] == b'}') else {
            out.push('{');
            rest = after;
            continue;
        };
        let key = &after[..close];
        match inputs.get(key) {
            Some(value) => out.push_str(&input_text(value)),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Render an input value as prompt text. Strings are used bare.
pub fn input_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
