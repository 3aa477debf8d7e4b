use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MissionDeployed,
    MissionStarted,
    MissionCompleted,
    MissionFailed,
    MissionAborted,
    StepStarted,
    StepCompleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissionDeployed => "mission.deployed",
            Self::MissionStarted => "mission.started",
            Self::MissionCompleted => "mission.completed",
            Self::MissionFailed => "mission.failed",
            Self::MissionAborted => "mission.aborted",
            Self::StepStarted => "step.started",
            Self::StepCompleted => "step.completed",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::MissionFailed | Self::MissionAborted)
    }

    pub fn is_mission_level(&self) -> bool {
        !matches!(self, Self::StepStarted | Self::StepCompleted)
    }
}

/// One lifecycle announcement handed to the notification sink. Concrete
/// delivery (admin console, desktop, webhook) is external.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionEvent {
    pub event_type: EventType,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// (current step, plan length) while executing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<(usize, usize)>,
}

impl MissionEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            created_at: Utc::now(),
            agent: None,
            task: None,
            message: None,
            progress: None,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_progress(mut self, current: usize, total: usize) -> Self {
        self.progress = Some((current, total));
        self
    }

    /// Wire form for sinks that deliver structured payloads.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn body(&self) -> String {
        let mut parts = Vec::new();

        if let Some(agent) = &self.agent {
            parts.push(format!("Agent: {}", agent));
        }
        if let Some(task) = &self.task {
            parts.push(format!("Task: {}", task));
        }
        if let Some((current, total)) = self.progress {
            parts.push(format!("Progress: {}/{}", current, total));
        }
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }

        parts.join("\n")
    }
}
