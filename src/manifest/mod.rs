//! Static capability descriptors: agent and team manifests, the built-in
//! catalog, and the credential vault consulted before deploy.

mod agent;
mod catalog;
mod team;
mod vault;

pub use agent::{AgentManifest, ToolManifest};
pub use catalog::Catalog;
pub use team::{OrchestratorManifest, TeamManifest};
pub use vault::{CredentialStore, Vault};
