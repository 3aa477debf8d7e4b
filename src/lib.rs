pub mod config;
pub mod controller;
pub mod error;
pub mod journal;
pub mod manifest;
pub mod memory;
pub mod mission;
pub mod notification;
pub mod planner;
pub mod registry;
pub mod scheduler;

pub use config::{ControlConfig, NotificationConfig, SelectionConfig, SimulationConfig};
pub use controller::{
    DeployRequest, MissionController, MissionControllerBuilder, MissionSnapshot,
    SUPPORTED_PROVIDERS,
};
pub use error::{ControlError, Result};
pub use journal::{AuditLog, LogEntry, LogKind};
pub use manifest::{
    AgentManifest, Catalog, CredentialStore, OrchestratorManifest, TeamManifest, ToolManifest,
    Vault,
};
pub use memory::{SharedMemoryEntry, SharedMemoryStore};
pub use mission::{MissionBriefing, MissionPhase, MissionPlan, MissionState, MissionStep};
pub use notification::{EventType, MemorySink, MissionEvent, NotificationSink, TracingSink};
pub use planner::{PlanRequest, Planner, ScriptedPlanner, ScriptedThoughts, ThoughtSource};
pub use registry::{AgentRegistry, AgentRuntime, AgentStatus};
