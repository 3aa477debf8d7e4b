//! End-to-end mission lifecycle tests driven under paused time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mission_control::config::ControlConfig;
use mission_control::controller::{DeployRequest, MissionController};
use mission_control::error::{ControlError, Result};
use mission_control::manifest::Vault;
use mission_control::mission::{MissionPhase, MissionStep};
use mission_control::notification::{EventType, MemorySink};
use mission_control::planner::{FailingThoughts, PlanRequest, Planner};
use mission_control::registry::AgentStatus;

fn ready_vault() -> Arc<Vault> {
    let vault = Vault::new();
    vault.set("SEARCH_API_KEY", "sk-test");
    vault.set("ANALYTICS_API_KEY", "an-test");
    Arc::new(vault)
}

fn briefing() -> DeployRequest {
    DeployRequest::new(
        "Launch the fall campaign",
        "B2B founders",
        "newsletter signup rate",
        "2x signups by end of quarter",
    )
}

fn no_failure_config() -> ControlConfig {
    let mut config = ControlConfig::default();
    config.simulation.failure_chance = 0;
    config
}

struct RefusingPlanner;

#[async_trait]
impl Planner for RefusingPlanner {
    async fn generate_plan(&self, _request: &PlanRequest) -> Result<Vec<MissionStep>> {
        Err(ControlError::Planning("model refused the request".to_string()))
    }
}

struct PhantomPlanner;

#[async_trait]
impl Planner for PhantomPlanner {
    async fn generate_plan(&self, _request: &PlanRequest) -> Result<Vec<MissionStep>> {
        Ok(vec![MissionStep::new("Phantom", "haunt the pipeline", "")])
    }
}

struct SingleStepPlanner;

#[async_trait]
impl Planner for SingleStepPlanner {
    async fn generate_plan(&self, _request: &PlanRequest) -> Result<Vec<MissionStep>> {
        Ok(vec![MissionStep::new(
            "Scout",
            "Use web_search to survey the market",
            "recon first",
        )])
    }
}

#[tokio::test(start_paused = true)]
async fn test_mission_runs_to_completion() {
    let sink = Arc::new(MemorySink::new());
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .with_sink(sink.clone())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.phase().await, MissionPhase::Planning);

    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Completed);

    let agents = controller.agents().await;
    assert_eq!(agents.len(), 4);
    assert!(agents.iter().all(|a| a.status == AgentStatus::Standby));

    let memory = controller.shared_memory().await;
    assert_eq!(memory.len(), 4);
    assert_eq!(memory[0].key, "task_0_result");
    assert_eq!(memory[3].key, "task_3_result");
    assert!(memory.iter().all(|e| e.value.starts_with("Completed: ")));

    let logs = controller.logs().await;
    assert!(logs
        .iter()
        .any(|l| l.message.contains("Mission plan generated successfully")));
    assert!(logs.iter().any(|l| l.message.contains("accomplished")));

    let plan = controller.completed_plan().await.unwrap();
    assert_eq!(plan.len(), 4);

    let events: Vec<EventType> = sink.events().iter().map(|e| e.event_type).collect();
    assert_eq!(events[0], EventType::MissionDeployed);
    assert_eq!(events[1], EventType::MissionStarted);
    assert_eq!(*events.last().unwrap(), EventType::MissionCompleted);
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == EventType::StepCompleted)
            .count(),
        4
    );
}

#[tokio::test(start_paused = true)]
async fn test_injected_failure_halts_mission() {
    let sink = Arc::new(MemorySink::new());
    let mut config = ControlConfig::default();
    config.simulation.failure_chance = 100;
    let controller = MissionController::builder()
        .with_config(config)
        .with_vault(ready_vault())
        .with_sink(sink.clone())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Failed);

    // Step 0 always succeeds; step 1 fails at 100% chance. The first agent
    // keeps its completed status, the failing agent ends in error, the rest
    // stand down.
    let agents = controller.agents().await;
    let scout = agents.iter().find(|a| a.name == "Scout").unwrap();
    let scribe = agents.iter().find(|a| a.name == "Scribe").unwrap();
    let quant = agents.iter().find(|a| a.name == "Quant").unwrap();
    assert_eq!(scout.status, AgentStatus::TaskCompleted);
    assert_eq!(scribe.status, AgentStatus::Error);
    assert_eq!(scribe.current_task, "Task Failed");
    assert_eq!(quant.status, AgentStatus::Standby);

    let memory = controller.shared_memory().await;
    assert_eq!(memory.len(), 1);
    assert_eq!(memory[0].key, "task_0_result");

    let logs = controller.logs().await;
    assert!(logs
        .iter()
        .any(|l| l.message.contains("failed. Critical error during execution.")));

    let events = sink.events();
    let last = events.last().unwrap();
    assert_eq!(last.event_type, EventType::MissionFailed);
    let message = last.message.as_deref().unwrap();
    assert!(message.contains("failed. Critical error during execution."));
    assert!(message.contains("Scribe"));
}

#[tokio::test(start_paused = true)]
async fn test_single_step_mission_completes() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .with_planner(Arc::new(SingleStepPlanner))
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Completed);

    let agents = controller.agents().await;
    let scout = agents.iter().find(|a| a.name == "Scout").unwrap();
    assert_eq!(scout.status, AgentStatus::Standby);

    let memory = controller.shared_memory().await;
    assert_eq!(memory.len(), 1);
    assert_eq!(memory[0].key, "task_0_result");
    assert_eq!(memory[0].written_by, "Scout");
}

#[tokio::test(start_paused = true)]
async fn test_single_step_mission_immune_to_full_failure_chance() {
    let mut config = ControlConfig::default();
    config.simulation.failure_chance = 100;
    let controller = MissionController::builder()
        .with_config(config)
        .with_vault(ready_vault())
        .with_planner(Arc::new(SingleStepPlanner))
        .build()
        .unwrap();

    // Step 0 bootstraps the mission and never fails, so a one-step plan
    // completes even at 100% failure chance.
    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Completed);
    assert_eq!(controller.shared_memory().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_mutation_after_abort() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    loop {
        let snapshot = controller.snapshot().await;
        if snapshot.phase == MissionPhase::Executing && snapshot.cursor >= 1 {
            break;
        }
        assert!(!snapshot.phase.is_terminal(), "mission finished before abort");
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    controller.abort().await.unwrap();

    let memory_len = controller.shared_memory().await.len();
    let log_len = controller.logs().await.len();

    // Long after any in-flight step timer would have fired, the aborted
    // cycle must not have touched state again.
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(controller.phase().await, MissionPhase::Aborted);
    assert_eq!(controller.shared_memory().await.len(), memory_len);
    assert_eq!(controller.logs().await.len(), log_len);
    let agents = controller.agents().await;
    assert!(agents.iter().all(|a| a.status == AgentStatus::Standby));
}

#[tokio::test(start_paused = true)]
async fn test_planning_failure_marks_all_agents() {
    let sink = Arc::new(MemorySink::new());
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .with_planner(Arc::new(RefusingPlanner))
        .with_sink(sink.clone())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Failed);

    let agents = controller.agents().await;
    assert!(agents.iter().all(|a| a.status == AgentStatus::Error));
    assert!(agents.iter().all(|a| a.current_task == "Planning Failed"));

    let logs = controller.logs().await;
    assert!(logs.iter().any(|l| l.message.contains("Mission planning failed")));
    assert!(controller.shared_memory().await.is_empty());
    assert!(sink
        .events()
        .iter()
        .any(|e| e.event_type == EventType::MissionFailed));
}

#[tokio::test(start_paused = true)]
async fn test_plan_naming_unknown_agent_fails_planning() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .with_planner(Arc::new(PhantomPlanner))
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Failed);

    let logs = controller.logs().await;
    assert!(logs.iter().any(|l| l.message.contains("Phantom")));
}

#[tokio::test(start_paused = true)]
async fn test_abort_mid_mission_and_redeploy() {
    let sink = Arc::new(MemorySink::new());
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .with_sink(sink.clone())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();

    // Let at least one step execute before pulling the plug.
    loop {
        let snapshot = controller.snapshot().await;
        if snapshot.phase == MissionPhase::Executing && snapshot.cursor >= 1 {
            break;
        }
        assert!(!snapshot.phase.is_terminal(), "mission finished before abort");
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    controller.abort().await.unwrap();

    assert_eq!(controller.phase().await, MissionPhase::Aborted);
    let snapshot = controller.snapshot().await;
    assert!(snapshot.plan_len.is_none());

    let agents = controller.agents().await;
    assert!(agents.iter().all(|a| a.status == AgentStatus::Standby));
    assert!(agents.iter().all(|a| a.current_task == "Aborted"));

    let logs = controller.logs().await;
    assert!(logs.iter().any(|l| l.message == "MISSION ABORTED BY USER."));
    assert!(sink
        .events()
        .iter()
        .any(|e| e.event_type == EventType::MissionAborted));

    // A terminal phase admits a fresh deploy; the new cycle starts clean.
    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Completed);
    assert_eq!(controller.shared_memory().await.len(), 4);
    assert!(!controller
        .logs()
        .await
        .iter()
        .any(|l| l.message.contains("ABORTED")));
}

#[tokio::test]
async fn test_abort_without_active_mission_is_noop() {
    let controller = MissionController::builder()
        .with_vault(ready_vault())
        .build()
        .unwrap();

    controller.abort().await.unwrap();
    assert_eq!(controller.phase().await, MissionPhase::Idle);
    assert!(controller.logs().await.is_empty());
}

#[tokio::test]
async fn test_deploy_rejects_blank_parameters() {
    let controller = MissionController::builder()
        .with_vault(ready_vault())
        .build()
        .unwrap();

    let request = DeployRequest::new("  ", "B2B founders", "signups", "2x signups");
    let err = controller.deploy(request).await.unwrap_err();
    assert!(matches!(err, ControlError::Validation(_)));
    assert!(err.to_string().contains("objective"));
    assert_eq!(controller.phase().await, MissionPhase::Idle);
    assert!(controller.logs().await.is_empty());
}

#[tokio::test]
async fn test_deploy_rejects_missing_credentials() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .build()
        .unwrap();

    let err = controller.deploy(briefing()).await.unwrap_err();
    assert!(matches!(err, ControlError::Deployment(_)));
    assert!(err.to_string().contains("SEARCH_API_KEY"));
    assert_eq!(controller.phase().await, MissionPhase::Idle);
}

#[tokio::test]
async fn test_deploy_rejects_unsupported_provider() {
    let mut config = no_failure_config();
    config.selection.provider = "Acme LLM".to_string();
    let controller = MissionController::builder()
        .with_config(config)
        .with_vault(ready_vault())
        .build()
        .unwrap();

    let err = controller.deploy(briefing()).await.unwrap_err();
    assert!(matches!(err, ControlError::Deployment(_)));
    assert!(err.to_string().contains("Acme LLM"));
}

#[tokio::test]
async fn test_deploy_rejects_unknown_team() {
    let mut config = no_failure_config();
    config.selection.team = "No Such Team".to_string();
    let controller = MissionController::builder()
        .with_config(config)
        .with_vault(ready_vault())
        .build()
        .unwrap();

    let err = controller.deploy(briefing()).await.unwrap_err();
    assert!(matches!(err, ControlError::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn test_deploy_rejects_while_mission_active() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    let err = controller.deploy(briefing()).await.unwrap_err();
    assert!(matches!(err, ControlError::MissionActive(_)));

    controller.wait_for_terminal().await;
}

#[tokio::test(start_paused = true)]
async fn test_settings_locked_while_active() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();

    let err = controller.select_team("Intel Cell").await.unwrap_err();
    assert!(matches!(err, ControlError::MissionActive(_)));

    let timing = controller.timing().await;
    let err = controller.set_timing(timing).await.unwrap_err();
    assert!(matches!(err, ControlError::MissionActive(_)));

    controller.wait_for_terminal().await;
}

#[tokio::test(start_paused = true)]
async fn test_select_team_changes_roster() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .build()
        .unwrap();

    controller.select_team("Intel Cell").await.unwrap();
    assert_eq!(controller.agents().await.len(), 2);

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Completed);
    assert_eq!(controller.shared_memory().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_thought_stream_failure_does_not_block_step() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .with_thoughts(Arc::new(FailingThoughts))
        .build()
        .unwrap();

    controller.deploy(briefing()).await.unwrap();
    assert_eq!(controller.wait_for_terminal().await, MissionPhase::Completed);

    let logs = controller.logs().await;
    assert!(logs
        .iter()
        .any(|l| l.message.contains("Failed to generate thought process")));
    assert_eq!(controller.shared_memory().await.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_status_report_tracks_lifecycle() {
    let controller = MissionController::builder()
        .with_config(no_failure_config())
        .with_vault(ready_vault())
        .build()
        .unwrap();

    assert_eq!(
        controller.status_report().await,
        "No active mission. Ready for deployment."
    );

    controller.deploy(briefing()).await.unwrap();
    assert!(controller
        .status_report()
        .await
        .starts_with("Mission status: PLANNING"));

    controller.wait_for_terminal().await;
    assert_eq!(controller.status_report().await, "Mission status: COMPLETE");
}
