use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mission_control::config::ControlConfig;
use mission_control::controller::{DeployRequest, MissionController};
use mission_control::error::Result;
use mission_control::manifest::{Catalog, Vault};
use mission_control::mission::MissionPhase;

#[derive(Parser)]
#[command(name = "mission-control", about = "Simulated multi-agent mission console", version)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding config.toml (defaults to the working directory).
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a mission and run it to a terminal phase.
    Run {
        /// The mission objective.
        objective: String,
        /// Audience the mission output targets.
        #[arg(long, default_value = "General stakeholders")]
        target_audience: String,
        /// KPIs the mission is measured against.
        #[arg(long, default_value = "Completion of all planned tasks")]
        kpis: String,
        /// Desired outcomes of the mission.
        #[arg(long, default_value = "All tasks completed without incident")]
        desired_outcomes: String,
        /// Team to deploy, overriding the configured selection.
        #[arg(long)]
        team: Option<String>,
        /// Failure-injection chance override, 0-100.
        #[arg(long)]
        failure_chance: Option<u8>,
        /// Seed for deterministic failure injection.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the built-in agent catalog and teams.
    Roster,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mission_control=debug")
    } else {
        EnvFilter::new("mission_control=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config_dir = cli.config_dir.unwrap_or_else(|| PathBuf::from("."));
    let mut config = ControlConfig::load(&config_dir).await?;

    match cli.command {
        Commands::Roster => {
            print_roster(&Catalog::builtin());
            Ok(())
        }
        Commands::Run {
            objective,
            target_audience,
            kpis,
            desired_outcomes,
            team,
            failure_chance,
            seed,
        } => {
            if let Some(team) = team {
                config.selection.team = team;
            }
            if let Some(chance) = failure_chance {
                config.simulation.failure_chance = chance;
            }

            let mut builder = MissionController::builder()
                .with_config(config)
                .with_vault(simulated_vault());
            if let Some(seed) = seed {
                builder = builder.with_rng_seed(seed);
            }
            let controller = builder.build()?;

            controller
                .deploy(DeployRequest::new(
                    objective,
                    target_audience,
                    kpis,
                    desired_outcomes,
                ))
                .await?;

            let terminal = tokio::select! {
                phase = controller.wait_for_terminal() => phase,
                _ = tokio::signal::ctrl_c() => {
                    controller.abort().await?;
                    MissionPhase::Aborted
                }
            };

            print_summary(&controller, terminal).await;
            Ok(())
        }
    }
}

/// The simulation never calls external services, so the vault is seeded with
/// placeholder values covering every catalog credential.
fn simulated_vault() -> std::sync::Arc<Vault> {
    let vault = Vault::new();
    for agent in Catalog::builtin().agents().values() {
        for key in &agent.required_env {
            vault.set(key.as_str(), "simulated");
        }
    }
    std::sync::Arc::new(vault)
}

fn print_roster(catalog: &Catalog) {
    let orchestrator = catalog.orchestrator();
    println!("Orchestrator: {} v{}", orchestrator.name, orchestrator.version);
    for team in catalog.teams() {
        println!("\n{} - {}", team.name, team.description);
        for member in &team.members {
            if let Some(agent) = catalog.agent(member) {
                let tools: Vec<&str> = agent.tools.iter().map(|t| t.name.as_str()).collect();
                println!("  {:8} {}", agent.name, agent.description);
                if !tools.is_empty() {
                    println!("  {:8} tools: {}", "", tools.join(", "));
                }
            }
        }
        for objective in catalog.sample_objectives(&team.name) {
            println!("  e.g. \"{objective}\"");
        }
    }
}

async fn print_summary(controller: &MissionController, terminal: MissionPhase) {
    println!("\n=== Audit log ===");
    for entry in controller.logs().await {
        println!(
            "[{}] {:7} {:8} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.kind,
            entry.source,
            entry.message
        );
    }

    let memory = controller.shared_memory().await;
    if !memory.is_empty() {
        println!("\n=== Shared memory ===");
        for entry in memory {
            println!("{} = {} (by {})", entry.key, entry.value, entry.written_by);
        }
    }

    if let Some(plan) = controller.completed_plan().await {
        println!("\n=== Completed plan ===");
        for (index, step) in plan.steps().iter().enumerate() {
            println!("{}. {} - {}", index + 1, step.agent, step.task);
        }
    }

    println!("\nFinal phase: {terminal}");
}
