//! Persisted configuration: TOML-backed scalar settings loaded at startup
//! and written back on change.

mod settings;

pub use settings::{
    ControlConfig, NotificationConfig, SelectionConfig, SimulationConfig, DEFAULT_MODEL,
};
