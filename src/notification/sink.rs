use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{error, info};

use super::MissionEvent;

/// Abstract channel for mission-lifecycle announcements. Delivery is
/// fire-and-forget: a sink may drop events but never surfaces errors into
/// the engine.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: &MissionEvent);
}

/// Delivers events as structured tracing output.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn notify(&self, event: &MissionEvent) {
        if event.event_type.is_error() {
            error!(event = event.event_type.as_str(), body = %event.body(), "Mission event");
        } else {
            info!(event = event.event_type.as_str(), body = %event.body(), "Mission event");
        }
    }
}

/// Retains every event in memory, mirroring an admin-console history feed.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<MissionEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MissionEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn notify(&self, event: &MissionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
