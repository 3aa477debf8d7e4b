//! Runtime roster for the active team.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::manifest::{AgentManifest, TeamManifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    #[default]
    Standby,
    Deployed,
    Processing,
    TaskCompleted,
    Error,
    Compromised,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Standby => "STANDBY",
            Self::Deployed => "DEPLOYED",
            Self::Processing => "PROCESSING",
            Self::TaskCompleted => "TASK_COMPLETED",
            Self::Error => "ERROR",
            Self::Compromised => "COMPROMISED",
        };
        write!(f, "{}", s)
    }
}

/// Mutable per-agent runtime state. Owned by the registry; mutated only by
/// the controller/scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRuntime {
    pub id: String,
    pub name: String,
    pub status: AgentStatus,
    pub current_task: String,
    pub current_thought: String,
    /// Name of the tool in use for the current step, if any.
    pub using_tool: Option<String>,
    pub manifest: AgentManifest,
}

impl AgentRuntime {
    fn from_manifest(manifest: AgentManifest) -> Self {
        Self {
            id: manifest.id.clone(),
            name: manifest.name.clone(),
            status: AgentStatus::Standby,
            current_task: String::new(),
            current_thought: String::new(),
            using_tool: None,
            manifest,
        }
    }
}

#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<AgentRuntime>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the roster from a team manifest, resolving each member id
    /// against the catalog. Unresolved ids are dropped silently; a team
    /// referencing a deleted agent degrades gracefully.
    pub fn rebuild(&mut self, team: &TeamManifest, catalog: &HashMap<String, AgentManifest>) {
        self.agents = team
            .members
            .iter()
            .filter_map(|id| match catalog.get(id) {
                Some(manifest) => Some(AgentRuntime::from_manifest(manifest.clone())),
                None => {
                    debug!(team = %team.name, agent_id = %id, "Dropping unresolved team member");
                    None
                }
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn snapshot(&self) -> Vec<AgentRuntime> {
        self.agents.clone()
    }

    pub fn by_id(&self, id: &str) -> Option<&AgentRuntime> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&AgentRuntime> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// Credential keys required across the whole roster, deduplicated.
    pub fn required_env(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for agent in &self.agents {
            for key in &agent.manifest.required_env {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    pub fn mark_all(&mut self, status: AgentStatus) {
        for agent in &mut self.agents {
            agent.status = status;
        }
    }

    pub fn mark_all_with_task(&mut self, status: AgentStatus, task: impl Into<String>) {
        let task = task.into();
        for agent in &mut self.agents {
            agent.status = status;
            agent.current_task = task.clone();
            agent.current_thought.clear();
        }
    }

    /// Marks the named agent Processing with a fresh task and empty thought.
    pub fn begin_task(&mut self, name: &str, task: &str) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.name == name) {
            agent.status = AgentStatus::Processing;
            agent.current_task = task.to_string();
            agent.current_thought.clear();
        }
    }

    /// Marks the named agent's step done and clears its transient thought.
    pub fn complete_agent(&mut self, name: &str) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.name == name) {
            agent.status = AgentStatus::TaskCompleted;
            agent.current_thought.clear();
        }
    }

    pub fn mark_error(&mut self, name: &str, task: &str) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.name == name) {
            agent.status = AgentStatus::Error;
            agent.current_task = task.to_string();
            agent.current_thought.clear();
        }
    }

    /// Failure policy: completed agents stay completed, everyone else
    /// returns to standby.
    pub fn standby_non_completed(&mut self) {
        for agent in &mut self.agents {
            if agent.status != AgentStatus::TaskCompleted {
                agent.status = AgentStatus::Standby;
                agent.current_task.clear();
                agent.current_thought.clear();
            }
        }
    }

    pub fn append_thought(&mut self, id: &str, chunk: &str) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.id == id) {
            agent.current_thought.push_str(chunk);
        }
    }

    pub fn set_thought(&mut self, id: &str, thought: &str) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.id == id) {
            agent.current_thought = thought.to_string();
        }
    }

    /// At most one agent uses a tool at a time; setting a user clears all
    /// other indicators.
    pub fn set_tool_in_use(&mut self, user: Option<(&str, &str)>) {
        for agent in &mut self.agents {
            agent.using_tool = None;
        }
        if let Some((id, tool)) = user {
            if let Some(agent) = self.agents.iter_mut().find(|a| a.id == id) {
                agent.using_tool = Some(tool.to_string());
            }
        }
    }

    pub fn processing_count(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.status == AgentStatus::Processing)
            .count()
    }

    /// Restores every agent to standby with empty task and thought.
    pub fn reset_mission(&mut self) {
        for agent in &mut self.agents {
            agent.status = AgentStatus::Standby;
            agent.current_task.clear();
            agent.current_thought.clear();
            agent.using_tool = None;
        }
    }
}
