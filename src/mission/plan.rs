use serde::{Deserialize, Serialize};

/// A single agent+task unit of work. Immutable once part of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStep {
    /// Name reference into the roster, not an owning pointer.
    pub agent: String,
    pub task: String,
    /// The planner's rationale for this assignment.
    pub thought: String,
}

impl MissionStep {
    pub fn new(
        agent: impl Into<String>,
        task: impl Into<String>,
        thought: impl Into<String>,
    ) -> Self {
        Self {
            agent: agent.into(),
            task: task.into(),
            thought: thought.into(),
        }
    }
}

/// Ordered sequence of steps; index 0..len-1 defines strict execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionPlan {
    steps: Vec<MissionStep>,
}

impl MissionPlan {
    pub fn new(steps: Vec<MissionStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&MissionStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[MissionStep] {
        &self.steps
    }
}
