use serde::{Deserialize, Serialize};

use super::{MissionPhase, MissionPlan, MissionStep};
use crate::error::Result;

/// Mission parameters passed through to the planner. Opaque to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionBriefing {
    pub objective: String,
    pub target_audience: String,
    pub kpis: String,
    pub desired_outcomes: String,
}

/// The controller's authoritative mission state. Single writer; every other
/// component sees snapshots.
#[derive(Debug, Clone, Default)]
pub struct MissionState {
    phase: MissionPhase,
    plan: Option<MissionPlan>,
    /// Index of the next step to execute. Monotonically non-decreasing
    /// within one mission cycle.
    cursor: usize,
    pub briefing: MissionBriefing,
    completed_plan: Option<MissionPlan>,
}

impl MissionState {
    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    pub fn transition(&mut self, to: MissionPhase) -> Result<MissionPhase> {
        self.phase = self.phase.transition_to(to)?;
        Ok(self.phase)
    }

    pub fn plan(&self) -> Option<&MissionPlan> {
        self.plan.as_ref()
    }

    pub fn set_plan(&mut self, plan: MissionPlan) {
        self.plan = Some(plan);
        self.cursor = 0;
    }

    pub fn clear_plan(&mut self) {
        self.plan = None;
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advances the cursor by one step. Never moves past the plan length.
    pub fn advance_cursor(&mut self) {
        let len = self.plan.as_ref().map(MissionPlan::len).unwrap_or(0);
        if self.cursor < len {
            self.cursor += 1;
        }
    }

    pub fn current_step(&self) -> Option<&MissionStep> {
        self.plan.as_ref().and_then(|p| p.step(self.cursor))
    }

    /// True once every planned step has executed.
    pub fn is_exhausted(&self) -> bool {
        match &self.plan {
            Some(plan) => self.cursor >= plan.len(),
            None => true,
        }
    }

    /// Moves the active plan into the completed snapshot for summary display.
    pub fn finish_plan(&mut self) {
        self.completed_plan = self.plan.take();
    }

    pub fn completed_plan(&self) -> Option<&MissionPlan> {
        self.completed_plan.as_ref()
    }

    /// Clears per-cycle state ahead of a fresh deploy. The phase itself is
    /// owned by the controller's transition calls.
    pub fn reset_cycle(&mut self) {
        self.plan = None;
        self.cursor = 0;
        self.briefing = MissionBriefing::default();
    }
}
