//! Plan-generation collaborator boundary. The engine only consumes the
//! contract; the scripted implementation keeps the simulation
//! self-contained without any external AI calls.

mod thought;

use async_trait::async_trait;

use crate::error::{ControlError, Result};
use crate::manifest::{AgentManifest, OrchestratorManifest, TeamManifest};
use crate::mission::MissionStep;

pub use thought::{
    FailingThoughts, ScriptedThoughts, ThoughtRequest, ThoughtSource, THOUGHT_FAILURE_MARKER,
};

/// Everything the planner needs to author a mission plan. Briefing fields
/// are opaque pass-through strings.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub objective: String,
    pub team: TeamManifest,
    pub agents: Vec<AgentManifest>,
    pub orchestrator: OrchestratorManifest,
    pub industry: String,
    pub model: String,
    pub target_audience: String,
    pub kpis: String,
    pub desired_outcomes: String,
}

#[async_trait]
pub trait Planner: Send + Sync {
    /// Returned step `agent` values must name an agent present in
    /// `request.agents`; violations are a planning failure, not retried.
    async fn generate_plan(&self, request: &PlanRequest) -> Result<Vec<MissionStep>>;
}

/// Engine-side enforcement of the planner contract: a non-empty plan whose
/// every step resolves to a roster agent.
pub fn validate_plan(steps: &[MissionStep], agents: &[AgentManifest]) -> Result<()> {
    if steps.is_empty() {
        return Err(ControlError::Planning(
            "orchestrator returned an empty plan".to_string(),
        ));
    }
    for step in steps {
        if !agents.iter().any(|a| a.name == step.agent) {
            return Err(ControlError::AgentNotFound(step.agent.clone()));
        }
    }
    Ok(())
}

/// Deterministic planner that assigns one step per roster agent in team
/// order, phrasing each task around the agent's first declared tool so the
/// tool-usage path gets exercised.
#[derive(Debug, Default)]
pub struct ScriptedPlanner;

impl ScriptedPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn generate_plan(&self, request: &PlanRequest) -> Result<Vec<MissionStep>> {
        if request.agents.is_empty() {
            return Err(ControlError::Planning(
                "cannot plan for an empty roster".to_string(),
            ));
        }

        let steps = request
            .agents
            .iter()
            .map(|agent| {
                let task = match agent.tools.first() {
                    Some(tool) => format!(
                        "Use {} to advance \"{}\" for {}",
                        tool.name, request.objective, request.target_audience
                    ),
                    None => format!(
                        "Review progress on \"{}\" against KPIs: {}",
                        request.objective, request.kpis
                    ),
                };
                let thought = format!(
                    "{} doctrine: {} is best positioned for this step ({}).",
                    request.orchestrator.name, agent.name, agent.description
                );
                MissionStep::new(agent.name.clone(), task, thought)
            })
            .collect();

        Ok(steps)
    }
}
