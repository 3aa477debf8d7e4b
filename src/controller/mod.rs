//! Top-level mission state machine: validates deployments, invokes the
//! planner, and drives timed step execution through the scheduler.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::{ControlConfig, SelectionConfig, SimulationConfig};
use crate::error::{ControlError, Result};
use crate::journal::{AuditLog, LogEntry, LogKind};
use crate::manifest::{Catalog, CredentialStore, Vault};
use crate::memory::{SharedMemoryEntry, SharedMemoryStore};
use crate::mission::{MissionBriefing, MissionPhase, MissionPlan, MissionState, MissionStep};
use crate::notification::{EventType, MissionEvent, NotificationSink, TracingSink};
use crate::planner::{
    validate_plan, PlanRequest, Planner, ScriptedPlanner, ScriptedThoughts, ThoughtRequest,
    ThoughtSource, THOUGHT_FAILURE_MARKER,
};
use crate::registry::{AgentRegistry, AgentRuntime, AgentStatus};
use crate::scheduler::{should_fail, CancellationToken, Scheduler};

/// Providers the orchestrator can actually drive.
pub const SUPPORTED_PROVIDERS: &[&str] = &["Google Gemini"];

const SYSTEM_SOURCE: &str = "SYSTEM";

/// A validated-on-entry deployment request. All four briefing parameters are
/// required; they pass through to the planner uninterpreted.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub objective: String,
    pub target_audience: String,
    pub kpis: String,
    pub desired_outcomes: String,
}

impl DeployRequest {
    pub fn new(
        objective: impl Into<String>,
        target_audience: impl Into<String>,
        kpis: impl Into<String>,
        desired_outcomes: impl Into<String>,
    ) -> Self {
        Self {
            objective: objective.into(),
            target_audience: target_audience.into(),
            kpis: kpis.into(),
            desired_outcomes: desired_outcomes.into(),
        }
    }
}

/// Cheap read-model of the mission for display collaborators.
#[derive(Debug, Clone)]
pub struct MissionSnapshot {
    pub phase: MissionPhase,
    pub cursor: usize,
    pub plan_len: Option<usize>,
    pub objective: String,
}

enum StepFlow {
    Continue,
    Done,
}

struct ControlState {
    mission: MissionState,
    registry: AgentRegistry,
    journal: AuditLog,
    memory: SharedMemoryStore,
    catalog: Catalog,
    selection: SelectionConfig,
    timing: SimulationConfig,
    notifications_enabled: bool,
    rng: SmallRng,
}

struct Inner {
    state: RwLock<ControlState>,
    scheduler: Scheduler,
    planner: Arc<dyn Planner>,
    thoughts: Arc<dyn ThoughtSource>,
    sink: Arc<dyn NotificationSink>,
    vault: Arc<dyn CredentialStore>,
    phase_tx: watch::Sender<MissionPhase>,
}

#[derive(Clone)]
pub struct MissionController {
    inner: Arc<Inner>,
}

pub struct MissionControllerBuilder {
    config: ControlConfig,
    catalog: Catalog,
    planner: Arc<dyn Planner>,
    thoughts: Arc<dyn ThoughtSource>,
    sink: Arc<dyn NotificationSink>,
    vault: Arc<dyn CredentialStore>,
    rng_seed: Option<u64>,
}

impl Default for MissionControllerBuilder {
    fn default() -> Self {
        Self {
            config: ControlConfig::default(),
            catalog: Catalog::builtin(),
            planner: Arc::new(ScriptedPlanner::new()),
            thoughts: Arc::new(ScriptedThoughts::new()),
            sink: Arc::new(TracingSink),
            vault: Arc::new(Vault::new()),
            rng_seed: None,
        }
    }
}

impl MissionControllerBuilder {
    pub fn with_config(mut self, config: ControlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_thoughts(mut self, thoughts: Arc<dyn ThoughtSource>) -> Self {
        self.thoughts = thoughts;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_vault(mut self, vault: Arc<dyn CredentialStore>) -> Self {
        self.vault = vault;
        self
    }

    /// Seeds the failure-injection RNG for deterministic runs.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<MissionController> {
        self.config.validate()?;

        let mut registry = AgentRegistry::new();
        if let Some(team) = self.catalog.team_by_name(&self.config.selection.team) {
            registry.rebuild(team, self.catalog.agents());
        }

        let rng = match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let (phase_tx, _) = watch::channel(MissionPhase::Idle);
        let state = ControlState {
            mission: MissionState::default(),
            registry,
            journal: AuditLog::new(),
            memory: SharedMemoryStore::new(),
            catalog: self.catalog,
            selection: self.config.selection,
            timing: self.config.simulation,
            notifications_enabled: self.config.notification.enabled,
            rng,
        };

        Ok(MissionController {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                scheduler: Scheduler::new(),
                planner: self.planner,
                thoughts: self.thoughts,
                sink: self.sink,
                vault: self.vault,
                phase_tx,
            }),
        })
    }
}

impl MissionController {
    pub fn builder() -> MissionControllerBuilder {
        MissionControllerBuilder::default()
    }

    /// Validates the request and, on success, kicks off a fresh mission
    /// cycle: planning delay, planner call, then timed step execution.
    /// Validation and deployment errors reject before any state change.
    pub async fn deploy(&self, request: DeployRequest) -> Result<()> {
        let token;
        {
            let mut state = self.inner.state.write().await;
            if state.mission.phase().is_active() {
                return Err(ControlError::MissionActive(
                    "a mission is already underway".to_string(),
                ));
            }

            let params = [
                ("objective", &request.objective),
                ("target audience", &request.target_audience),
                ("KPIs", &request.kpis),
                ("desired outcomes", &request.desired_outcomes),
            ];
            if let Some((name, _)) = params.iter().find(|(_, value)| value.trim().is_empty()) {
                return Err(ControlError::Validation(format!(
                    "mission parameter \"{}\" must not be empty",
                    name
                )));
            }
            if state.registry.is_empty() {
                return Err(ControlError::Validation("no team selected".to_string()));
            }
            let missing = self.inner.vault.missing(&state.registry.required_env());
            if !missing.is_empty() {
                return Err(ControlError::Deployment(format!(
                    "missing required credentials in vault: {}",
                    missing.join(", ")
                )));
            }
            if !SUPPORTED_PROVIDERS.contains(&state.selection.provider.as_str()) {
                return Err(ControlError::Deployment(format!(
                    "provider \"{}\" is not supported by the orchestrator",
                    state.selection.provider
                )));
            }

            // Supersede any timers left over from the previous cycle before
            // touching state.
            self.inner.scheduler.cancel_pending();
            token = self.inner.scheduler.token();

            state.mission.reset_cycle();
            state.journal.clear();
            state.memory.clear();
            state.registry.reset_mission();

            self.inner.apply_phase(&mut state, MissionPhase::Planning)?;
            state.mission.briefing = MissionBriefing {
                objective: request.objective.clone(),
                target_audience: request.target_audience.clone(),
                kpis: request.kpis.clone(),
                desired_outcomes: request.desired_outcomes.clone(),
            };

            let orchestrator = state.catalog.orchestrator().name.clone();
            let model = state.selection.model.clone();
            state.journal.append(
                &orchestrator,
                format!("Mission objective received: \"{}\"", request.objective),
                LogKind::Status,
            );
            state.journal.append(
                &orchestrator,
                format!("Engaging model {} to generate mission plan...", model),
                LogKind::Info,
            );

            let event = MissionEvent::new(EventType::MissionDeployed).with_message(format!(
                "Team: {}\nObjective: {}",
                state.selection.team, request.objective
            ));
            self.inner.notify(&state, event).await;

            info!(objective = %request.objective, team = %state.selection.team, "Mission deployed");
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            Inner::run_mission(inner, token).await;
        });
        Ok(())
    }

    /// Cancels any pending scheduled work and terminates the active cycle.
    /// Calling it with no active mission is a no-op; abort never errors on
    /// mission state.
    pub async fn abort(&self) -> Result<()> {
        let mut state = self.inner.state.write().await;
        if !state.mission.phase().is_active() {
            debug!(phase = %state.mission.phase(), "Abort ignored; no active mission");
            return Ok(());
        }

        self.inner.scheduler.cancel_pending();
        self.inner.apply_phase(&mut state, MissionPhase::Aborted)?;
        state.mission.clear_plan();
        state
            .journal
            .append(SYSTEM_SOURCE, "MISSION ABORTED BY USER.", LogKind::Error);
        state
            .registry
            .mark_all_with_task(AgentStatus::Standby, "Aborted");
        state.registry.set_tool_in_use(None);

        let event =
            MissionEvent::new(EventType::MissionAborted).with_message("Mission aborted by user.");
        self.inner.notify(&state, event).await;
        info!("Mission aborted");
        Ok(())
    }

    /// Selects a new team and rebuilds the roster. Locked while a mission is
    /// active.
    pub async fn select_team(&self, name: &str) -> Result<()> {
        let mut state = self.inner.state.write().await;
        if state.mission.phase().is_active() {
            return Err(ControlError::MissionActive(
                "team selection is locked during a mission".to_string(),
            ));
        }
        let team = state
            .catalog
            .team_by_name(name)
            .cloned()
            .ok_or_else(|| ControlError::Validation(format!("unknown team \"{}\"", name)))?;
        state.selection.team = team.name.clone();
        let catalog_agents = state.catalog.agents().clone();
        state.registry.rebuild(&team, &catalog_agents);
        Ok(())
    }

    /// Replaces timing and failure-injection settings. Locked while a
    /// mission is active.
    pub async fn set_timing(&self, timing: SimulationConfig) -> Result<()> {
        if timing.failure_chance > 100 {
            return Err(ControlError::Config(
                "failure_chance must be at most 100".to_string(),
            ));
        }
        let mut state = self.inner.state.write().await;
        if state.mission.phase().is_active() {
            return Err(ControlError::MissionActive(
                "timing settings are locked during a mission".to_string(),
            ));
        }
        state.timing = timing;
        Ok(())
    }

    pub async fn timing(&self) -> SimulationConfig {
        self.inner.state.read().await.timing.clone()
    }

    pub async fn phase(&self) -> MissionPhase {
        self.inner.state.read().await.mission.phase()
    }

    pub async fn snapshot(&self) -> MissionSnapshot {
        let state = self.inner.state.read().await;
        MissionSnapshot {
            phase: state.mission.phase(),
            cursor: state.mission.cursor(),
            plan_len: state.mission.plan().map(MissionPlan::len),
            objective: state.mission.briefing.objective.clone(),
        }
    }

    pub async fn agents(&self) -> Vec<AgentRuntime> {
        self.inner.state.read().await.registry.snapshot()
    }

    pub async fn logs(&self) -> Vec<LogEntry> {
        self.inner.state.read().await.journal.snapshot()
    }

    pub async fn shared_memory(&self) -> Vec<SharedMemoryEntry> {
        self.inner.state.read().await.memory.snapshot()
    }

    /// Snapshot of the finished plan after a completed mission, for summary
    /// display.
    pub async fn completed_plan(&self) -> Option<MissionPlan> {
        self.inner
            .state
            .read()
            .await
            .mission
            .completed_plan()
            .cloned()
    }

    /// Credential keys the current roster requires before deploy.
    pub async fn required_credentials(&self) -> Vec<String> {
        self.inner.state.read().await.registry.required_env()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<MissionPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// Waits until the current cycle reaches Completed, Failed, or Aborted.
    pub async fn wait_for_terminal(&self) -> MissionPhase {
        let mut rx = self.inner.phase_tx.subscribe();
        loop {
            let phase = *rx.borrow_and_update();
            if phase.is_terminal() {
                return phase;
            }
            if rx.changed().await.is_err() {
                return phase;
            }
        }
    }

    /// Human-readable mission status for the admin console.
    pub async fn status_report(&self) -> String {
        let state = self.inner.state.read().await;
        match state.mission.phase() {
            MissionPhase::Planning => format!(
                "Mission status: PLANNING\n{} is generating the mission plan...",
                state.catalog.orchestrator().name
            ),
            MissionPhase::Executing => match state.mission.current_step() {
                Some(step) => {
                    let total = state.mission.plan().map(MissionPlan::len).unwrap_or(0);
                    format!(
                        "Mission status: IN PROGRESS\nExecuting Step {} of {}:\nAgent: {}\nTask: {}",
                        state.mission.cursor() + 1,
                        total,
                        step.agent,
                        step.task
                    )
                }
                None => "Mission status: COMPLETE".to_string(),
            },
            MissionPhase::Completed => "Mission status: COMPLETE".to_string(),
            _ => "No active mission. Ready for deployment.".to_string(),
        }
    }
}

impl Inner {
    fn apply_phase(&self, state: &mut ControlState, to: MissionPhase) -> Result<()> {
        state.mission.transition(to)?;
        let _ = self.phase_tx.send(to);
        Ok(())
    }

    async fn notify(&self, state: &ControlState, event: MissionEvent) {
        if state.notifications_enabled {
            self.sink.notify(&event).await;
        }
    }

    /// The single logical timeline of one mission cycle. Runs as a spawned
    /// task under a generation token; any supersession cancels it between
    /// (never inside) state mutations.
    async fn run_mission(inner: Arc<Inner>, mut token: CancellationToken) {
        let planning_delay = inner.state.read().await.timing.planning_delay();
        if !token.sleep(planning_delay).await {
            debug!("Planning superseded before planner invocation");
            return;
        }

        let request = {
            let state = inner.state.read().await;
            let maybe_team = state.catalog.team_by_name(&state.selection.team).cloned();
            let team = match maybe_team {
                Some(team) => team,
                None => {
                    // Roster validation happens at deploy; losing the team
                    // mid-planning indicates a catalog edit race.
                    warn!(team = %state.selection.team, "Selected team vanished during planning");
                    drop(state);
                    let mut state = inner.state.write().await;
                    if !token.is_cancelled() {
                        inner
                            .fail_planning(
                                &mut state,
                                &ControlError::Planning("selected team not found".to_string()),
                            )
                            .await;
                    }
                    return;
                }
            };
            PlanRequest {
                objective: state.mission.briefing.objective.clone(),
                team,
                agents: state
                    .registry
                    .snapshot()
                    .into_iter()
                    .map(|agent| agent.manifest)
                    .collect(),
                orchestrator: state.catalog.orchestrator().clone(),
                industry: state.selection.industry.clone(),
                model: state.selection.model.clone(),
                target_audience: state.mission.briefing.target_audience.clone(),
                kpis: state.mission.briefing.kpis.clone(),
                desired_outcomes: state.mission.briefing.desired_outcomes.clone(),
            }
        };

        let outcome = inner.planner.generate_plan(&request).await.and_then(|steps| {
            validate_plan(&steps, &request.agents)?;
            Ok(steps)
        });

        {
            let mut state = inner.state.write().await;
            if token.is_cancelled() {
                debug!("Discarding late planner result");
                return;
            }
            match outcome {
                Ok(steps) => {
                    let plan_len = steps.len();
                    let orchestrator = state.catalog.orchestrator().name.clone();
                    state.journal.append(
                        &orchestrator,
                        "Mission plan generated successfully. Deploying agents.",
                        LogKind::Status,
                    );
                    state.mission.set_plan(MissionPlan::new(steps));
                    if let Err(e) = inner.apply_phase(&mut state, MissionPhase::Executing) {
                        error!(error = %e, "Phase transition to Executing failed");
                        return;
                    }
                    state.registry.mark_all(AgentStatus::Deployed);

                    let event = MissionEvent::new(EventType::MissionStarted)
                        .with_progress(0, plan_len)
                        .with_message("Mission plan generated. Agents deployed.");
                    inner.notify(&state, event).await;
                }
                Err(err) => {
                    inner.fail_planning(&mut state, &err).await;
                    return;
                }
            }
        }

        // Step 0 runs as soon as execution begins; every later tick waits
        // out the configured delay first.
        match Inner::step_tick(&inner, &token).await {
            StepFlow::Continue => {}
            StepFlow::Done => return,
        }
        loop {
            let step_delay = inner.state.read().await.timing.step_execution_delay();
            if !token.sleep(step_delay).await {
                debug!("Step timer superseded");
                return;
            }
            match Inner::step_tick(&inner, &token).await {
                StepFlow::Continue => {}
                StepFlow::Done => return,
            }
        }
    }

    async fn fail_planning(&self, state: &mut ControlState, err: &ControlError) {
        self.scheduler.cancel_pending();
        let orchestrator = state.catalog.orchestrator().name.clone();
        state.journal.append(
            &orchestrator,
            format!("Mission planning failed: {}", err),
            LogKind::Error,
        );
        if let Err(e) = self.apply_phase(state, MissionPhase::Failed) {
            error!(error = %e, "Phase transition to Failed failed");
        }
        state
            .registry
            .mark_all_with_task(AgentStatus::Error, "Planning Failed");

        let event = MissionEvent::new(EventType::MissionFailed)
            .with_message(format!("Mission planning failed: {}", err));
        self.notify(state, event).await;
        warn!(error = %err, "Mission planning failed");
    }

    /// One scheduled tick: completes the previous step's agent, then either
    /// finishes the mission, fails it, or executes the current step.
    async fn step_tick(inner: &Arc<Inner>, token: &CancellationToken) -> StepFlow {
        let mut state = inner.state.write().await;
        if token.is_cancelled() {
            return StepFlow::Done;
        }

        if state.mission.is_exhausted() {
            inner.complete_mission(&mut state).await;
            return StepFlow::Done;
        }

        let cursor = state.mission.cursor();
        let plan = match state.mission.plan() {
            Some(plan) => plan.clone(),
            None => return StepFlow::Done,
        };
        let step = match plan.step(cursor) {
            Some(step) => step.clone(),
            None => return StepFlow::Done,
        };
        let total = plan.len();

        // The previous step's agent completes before anything else happens
        // this tick, including the failure check.
        if cursor > 0 {
            if let Some(prev) = plan.step(cursor - 1) {
                let prev_agent = prev.agent.clone();
                state.registry.complete_agent(&prev_agent);
            }
        }

        // A step naming an agent outside the roster is a planner contract
        // violation. Fatal, no retry.
        let agent = match state.registry.by_name(&step.agent).cloned() {
            Some(agent) => agent,
            None => {
                inner.scheduler.cancel_pending();
                let err = ControlError::AgentNotFound(step.agent.clone());
                state.journal.append(
                    SYSTEM_SOURCE,
                    format!(
                        "Error: Could not find agent \"{}\" for current step. Aborting mission.",
                        step.agent
                    ),
                    LogKind::Error,
                );
                if let Err(e) = inner.apply_phase(&mut state, MissionPhase::Failed) {
                    error!(error = %e, "Phase transition to Failed failed");
                }
                state.registry.set_tool_in_use(None);
                let event = MissionEvent::new(EventType::MissionFailed)
                    .with_message(format!("{}. Mission halted.", err));
                inner.notify(&state, event).await;
                error!(error = %err, "Fatal: step references agent missing from roster");
                return StepFlow::Done;
            }
        };

        let chance = state.timing.failure_chance;
        if should_fail(cursor, chance, &mut state.rng) {
            inner.fail_mission(&mut state, &step, &agent).await;
            return StepFlow::Done;
        }

        state.registry.begin_task(&agent.name, &step.task);
        state.journal.append(
            &agent.name,
            format!("Executing task: \"{}\"", step.task),
            LogKind::Status,
        );
        let event = MissionEvent::new(EventType::StepStarted)
            .with_agent(&agent.name)
            .with_task(&step.task)
            .with_progress(cursor + 1, total);
        inner.notify(&state, event).await;

        // Thought streaming enriches agent state but never gates the step.
        Inner::spawn_thought_consumer(Arc::clone(inner), &state, &agent, &step, token.clone());

        match agent.manifest.tool_referenced_by(&step.task) {
            Some(tool) => {
                let tool_name = tool.name.clone();
                state
                    .registry
                    .set_tool_in_use(Some((agent.id.as_str(), tool_name.as_str())));
                state.journal.append(
                    &agent.name,
                    format!("Using tool: {}", tool_name),
                    LogKind::Command,
                );
            }
            None => state.registry.set_tool_in_use(None),
        }

        let key = SharedMemoryStore::step_key(cursor);
        state
            .memory
            .write(&key, format!("Completed: {}", step.task), &agent.name);
        state.journal.append(
            &agent.name,
            format!("Wrote result for task \"{}\" to shared memory.", step.task),
            LogKind::Info,
        );
        let event = MissionEvent::new(EventType::StepCompleted)
            .with_agent(&agent.name)
            .with_task(&step.task)
            .with_progress(cursor + 1, total);
        inner.notify(&state, event).await;

        state.mission.advance_cursor();
        StepFlow::Continue
    }

    async fn complete_mission(&self, state: &mut ControlState) {
        self.scheduler.cancel_pending();
        let orchestrator = state.catalog.orchestrator().name.clone();
        let objective = state.mission.briefing.objective.clone();
        state.journal.append(
            &orchestrator,
            format!(
                "Mission objective \"{}\" accomplished. All tasks completed.",
                objective
            ),
            LogKind::Status,
        );
        if let Err(e) = self.apply_phase(state, MissionPhase::Completed) {
            error!(error = %e, "Phase transition to Completed failed");
        }
        state.mission.finish_plan();
        state.registry.reset_mission();

        let event = MissionEvent::new(EventType::MissionCompleted)
            .with_message(format!("Mission accomplished: \"{}\"", objective));
        self.notify(state, event).await;
        info!(objective = %objective, "Mission completed");
    }

    /// Injected-failure path. Completed agents keep their status; everyone
    /// else stands down; the failing agent ends in ERROR.
    async fn fail_mission(&self, state: &mut ControlState, step: &MissionStep, agent: &AgentRuntime) {
        self.scheduler.cancel_pending();
        let err = ControlError::TaskFailed {
            agent: agent.name.clone(),
            task: step.task.clone(),
        };
        state.journal.append(
            &agent.name,
            format!(
                "Task \"{}\" failed. Critical error during execution.",
                step.task
            ),
            LogKind::Error,
        );
        if let Err(e) = self.apply_phase(state, MissionPhase::Failed) {
            error!(error = %e, "Phase transition to Failed failed");
        }
        state.registry.standby_non_completed();
        state.registry.mark_error(&agent.name, "Task Failed");
        state.registry.set_tool_in_use(None);

        let event = MissionEvent::new(EventType::MissionFailed)
            .with_agent(&agent.name)
            .with_task(&step.task)
            .with_message(err.to_string());
        self.notify(state, event).await;
        warn!(error = %err, "Injected task failure");
    }

    fn spawn_thought_consumer(
        inner: Arc<Inner>,
        state: &ControlState,
        agent: &AgentRuntime,
        step: &MissionStep,
        token: CancellationToken,
    ) {
        let request = ThoughtRequest {
            agent: agent.manifest.clone(),
            task: step.task.clone(),
            objective: state.mission.briefing.objective.clone(),
            model: state.selection.model.clone(),
        };
        let agent_id = agent.id.clone();
        let agent_name = agent.name.clone();

        tokio::spawn(async move {
            let mut rx = inner.thoughts.stream_thoughts(request).await;
            while let Some(chunk) = rx.recv().await {
                let mut state = inner.state.write().await;
                if token.is_cancelled() {
                    return;
                }
                match chunk {
                    Ok(text) => state.registry.append_thought(&agent_id, &text),
                    Err(err) => {
                        state.journal.append(
                            &agent_name,
                            format!("Failed to generate thought process: {}", err),
                            LogKind::Error,
                        );
                        state.registry.set_thought(&agent_id, THOUGHT_FAILURE_MARKER);
                        return;
                    }
                }
            }
        });
    }
}
