use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Deployment rejected: {0}")]
    Deployment(String),

    #[error("Planning failed: {0}")]
    Planning(String),

    #[error("Agent not found in roster: {0}")]
    AgentNotFound(String),

    #[error("Task \"{task}\" failed. Critical error during execution. (agent: {agent})")]
    TaskFailed { agent: String, task: String },

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Operation not allowed while a mission is active: {0}")]
    MissionActive(String),

    #[error("Thought stream error: {0}")]
    ThoughtStream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ControlError>;
