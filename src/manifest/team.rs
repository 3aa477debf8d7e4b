use serde::{Deserialize, Serialize};

/// A named selection of agents. Members reference agent ids in the catalog;
/// dangling ids degrade gracefully when the roster is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamManifest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
}

impl TeamManifest {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            members: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_member(mut self, agent_id: impl Into<String>) -> Self {
        self.members.push(agent_id.into());
        self
    }
}

/// The planner persona that authors mission plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorManifest {
    pub name: String,
    pub version: String,
    pub doctrine: String,
}

impl OrchestratorManifest {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        doctrine: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            doctrine: doctrine.into(),
        }
    }
}
