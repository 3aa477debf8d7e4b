use std::collections::HashMap;

use super::{AgentManifest, OrchestratorManifest, TeamManifest};

/// The built-in agent catalog, team manifests, and orchestrator persona used
/// by the simulation. Importing external manifests is out of scope; the
/// catalog is defined in code.
#[derive(Debug, Clone)]
pub struct Catalog {
    agents: HashMap<String, AgentManifest>,
    teams: Vec<TeamManifest>,
    orchestrator: OrchestratorManifest,
}

impl Catalog {
    pub fn builtin() -> Self {
        let agents = vec![
            AgentManifest::new("agt-scout", "Scout")
                .with_description("Market and competitor reconnaissance specialist")
                .with_persona(
                    "You are Scout, a terse reconnaissance analyst. You gather facts \
                     fast and report only what you can verify.",
                )
                .with_tool("web_search", "Query the public web for current information")
                .with_tool("crawler", "Walk a site and extract structured content")
                .with_required_env("SEARCH_API_KEY"),
            AgentManifest::new("agt-scribe", "Scribe")
                .with_description("Long-form content and messaging author")
                .with_persona(
                    "You are Scribe, a meticulous writer. You turn raw findings into \
                     clear, audience-ready copy.",
                )
                .with_tool("doc_writer", "Draft and format long-form documents"),
            AgentManifest::new("agt-quant", "Quant")
                .with_description("Metrics, forecasting, and KPI analysis")
                .with_persona(
                    "You are Quant, a numbers-first analyst. Every claim you make is \
                     backed by a figure.",
                )
                .with_tool("spreadsheet", "Build models and crunch tabular data")
                .with_required_env("ANALYTICS_API_KEY"),
            AgentManifest::new("agt-envoy", "Envoy")
                .with_description("Outreach and admin-console liaison")
                .with_persona(
                    "You are Envoy, the team's communicator. You keep stakeholders \
                     informed in their own language.",
                )
                .with_tool("mailer", "Compose and schedule outbound messages"),
            AgentManifest::new("agt-warden", "Warden")
                .with_description("Risk review and compliance gatekeeper")
                .with_persona(
                    "You are Warden, the cautious reviewer. You look for what could \
                     go wrong before it does.",
                ),
        ];

        let teams = vec![
            TeamManifest::new("team-growth", "Growth Strike Team")
                .with_description("Full-funnel growth unit: research, content, and metrics")
                .with_member("agt-scout")
                .with_member("agt-scribe")
                .with_member("agt-quant")
                .with_member("agt-envoy"),
            TeamManifest::new("team-intel", "Intel Cell")
                .with_description("Lean reconnaissance and risk assessment duo")
                .with_member("agt-scout")
                .with_member("agt-warden"),
        ];

        let orchestrator = OrchestratorManifest::new(
            "ORACLE",
            "7.3",
            "Decompose the objective into the fewest sequential steps that cover \
             research, production, and review. Assign each step to the single \
             best-suited agent and never invent agents outside the roster.",
        );

        Self {
            agents: agents.into_iter().map(|a| (a.id.clone(), a)).collect(),
            teams,
            orchestrator,
        }
    }

    pub fn agent(&self, id: &str) -> Option<&AgentManifest> {
        self.agents.get(id)
    }

    pub fn agents(&self) -> &HashMap<String, AgentManifest> {
        &self.agents
    }

    pub fn teams(&self) -> &[TeamManifest] {
        &self.teams
    }

    pub fn team_by_name(&self, name: &str) -> Option<&TeamManifest> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn orchestrator(&self) -> &OrchestratorManifest {
        &self.orchestrator
    }

    /// Sample objectives per team, surfaced by the CLI.
    pub fn sample_objectives(&self, team_name: &str) -> Vec<&'static str> {
        match self.team_by_name(team_name).map(|t| t.id.as_str()) {
            Some("team-growth") => vec![
                "Launch a product-led growth campaign for the Q4 release",
                "Double newsletter signups within one quarter",
            ],
            Some("team-intel") => vec![
                "Map the competitive landscape for autonomous-agent tooling",
                "Assess regulatory exposure of the new data pipeline",
            ],
            _ => Vec::new(),
        }
    }
}
