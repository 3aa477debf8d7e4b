use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolManifest {
    pub name: String,
    pub description: String,
}

impl ToolManifest {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Immutable capability descriptor for one agent. Runtime status lives in
/// the registry, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentManifest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    /// System-prompt persona handed to the thought-stream collaborator.
    pub persona: String,
    #[serde(default)]
    pub tools: Vec<ToolManifest>,
    /// Credential keys that must be present in the vault before deploy.
    #[serde(default)]
    pub required_env: Vec<String>,
}

impl AgentManifest {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: "1.0.0".to_string(),
            persona: String::new(),
            tools: Vec::new(),
            required_env: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tools.push(ToolManifest::new(name, description));
        self
    }

    pub fn with_required_env(mut self, key: impl Into<String>) -> Self {
        self.required_env.push(key.into());
        self
    }

    /// Case-insensitive lookup of a declared tool referenced by task text.
    pub fn tool_referenced_by(&self, task: &str) -> Option<&ToolManifest> {
        let task = task.to_lowercase();
        self.tools
            .iter()
            .find(|tool| task.contains(&tool.name.to_lowercase()))
    }
}
