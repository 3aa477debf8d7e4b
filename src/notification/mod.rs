//! Mission event notification system.
//!
//! - `MissionEvent` / `EventType`: lifecycle event payloads
//! - `NotificationSink`: abstract delivery channel with built-in tracing and
//!   in-memory sinks

mod events;
mod sink;

pub use events::{EventType, MissionEvent};
pub use sink::{MemorySink, NotificationSink, TracingSink};
