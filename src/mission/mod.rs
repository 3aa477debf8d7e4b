//! Mission data model: the phase state machine, the immutable plan, and the
//! controller-owned state aggregate.

mod phase;
mod plan;
mod state;

pub use phase::MissionPhase;
pub use plan::{MissionPlan, MissionStep};
pub use state::{MissionBriefing, MissionState};
