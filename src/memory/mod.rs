//! Append-only shared memory written during mission execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable shared-memory record. Later writes to the same key are new
/// entries; nothing is ever overwritten in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMemoryEntry {
    pub key: String,
    pub value: String,
    pub written_by: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SharedMemoryStore {
    entries: Vec<SharedMemoryEntry>,
}

impl SharedMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for the result of one plan step.
    pub fn step_key(index: usize) -> String {
        format!("task_{}_result", index)
    }

    pub fn write(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        written_by: impl Into<String>,
    ) -> &SharedMemoryEntry {
        self.entries.push(SharedMemoryEntry {
            key: key.into(),
            value: value.into(),
            written_by: written_by.into(),
            timestamp: Utc::now(),
        });
        self.entries
            .last()
            .unwrap_or_else(|| unreachable!("entry was just pushed"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> Vec<SharedMemoryEntry> {
        self.entries.clone()
    }

    /// Cleared only on mission reset, never during execution.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
