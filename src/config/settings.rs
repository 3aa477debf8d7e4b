use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{ControlError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Mission-independent settings persisted across sessions. The engine only
/// reads and writes these scalars, never mission runtime state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub simulation: SimulationConfig,
    pub selection: SelectionConfig,
    pub notification: NotificationConfig,
}

impl ControlConfig {
    pub async fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");
        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config_dir: &Path) -> Result<()> {
        self.validate()?;
        fs::create_dir_all(config_dir).await?;
        let config_path = config_dir.join("config.toml");
        let content =
            toml::to_string_pretty(self).map_err(|e| ControlError::Config(e.to_string()))?;
        fs::write(&config_path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.simulation.failure_chance > 100 {
            errors.push("simulation.failure_chance must be at most 100");
        }
        if self.simulation.planning_delay_ms == 0 {
            errors.push("simulation.planning_delay_ms must be nonzero");
        }
        if self.simulation.step_execution_delay_ms == 0 {
            errors.push("simulation.step_execution_delay_ms must be nonzero");
        }
        if self.selection.team.is_empty() {
            errors.push("selection.team must not be empty");
        }
        if self.selection.provider.is_empty() {
            errors.push("selection.provider must not be empty");
        }
        if self.selection.model.is_empty() {
            errors.push("selection.model must not be empty");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ControlError::Config(errors.join("; ")))
        }
    }
}

/// Timing and failure-injection knobs. Changeable only while no mission is
/// active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay before the planner collaborator is invoked.
    pub planning_delay_ms: u64,
    /// Delay between consecutive step executions.
    pub step_execution_delay_ms: u64,
    /// Percent chance, 0-100, that a step past index 0 fails.
    pub failure_chance: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            planning_delay_ms: 2000,
            step_execution_delay_ms: 4000,
            failure_chance: 15,
        }
    }
}

impl SimulationConfig {
    pub fn planning_delay(&self) -> Duration {
        Duration::from_millis(self.planning_delay_ms)
    }

    pub fn step_execution_delay(&self) -> Duration {
        Duration::from_millis(self.step_execution_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub team: String,
    pub provider: String,
    pub model: String,
    pub industry: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            team: "Growth Strike Team".to_string(),
            provider: "Google Gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            industry: "Technology".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControlConfig::default();
        assert_eq!(config.simulation.planning_delay_ms, 2000);
        assert_eq!(config.simulation.step_execution_delay_ms, 4000);
        assert_eq!(config.simulation.failure_chance, 15);
        assert_eq!(config.selection.provider, "Google Gemini");
        assert!(config.notification.enabled);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ControlConfig::default();
        config.simulation.failure_chance = 101;
        config.selection.model.clear();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("failure_chance"));
        assert!(err.contains("model"));
    }
}
