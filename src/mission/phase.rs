use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionPhase {
    #[default]
    Idle,
    Planning,
    Executing,
    Completed,
    Failed,
    Aborted,
}

impl MissionPhase {
    pub fn allowed_transitions(&self) -> &'static [MissionPhase] {
        use MissionPhase::*;
        match self {
            Idle => &[Planning],
            Planning => &[Executing, Failed, Aborted],
            Executing => &[Completed, Failed, Aborted],
            // Terminal phases are stable until the next deploy starts a fresh cycle.
            Completed => &[Planning],
            Failed => &[Planning],
            Aborted => &[Planning],
        }
    }

    pub fn can_transition_to(&self, target: MissionPhase) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn transition_to(&self, target: MissionPhase) -> Result<MissionPhase> {
        if !self.can_transition_to(target) {
            return Err(ControlError::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        Ok(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MissionPhase::Completed | MissionPhase::Failed | MissionPhase::Aborted
        )
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MissionPhase::Planning | MissionPhase::Executing)
    }
}

impl fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::Planning => "Planning",
            Self::Executing => "Executing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Aborted => "Aborted",
        };
        write!(f, "{}", s)
    }
}
