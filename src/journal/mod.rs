//! Ordered, append-only audit record of mission activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Info,
    Status,
    Command,
    Error,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Status => "STATUS",
            Self::Command => "COMMAND",
            Self::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub message: String,
    pub kind: LogKind,
}

#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<LogEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        source: impl Into<String>,
        message: impl Into<String>,
        kind: LogKind,
    ) -> &LogEntry {
        let entry = LogEntry {
            id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
            timestamp: Utc::now(),
            source: source.into(),
            message: message.into(),
            kind,
        };
        debug!(source = %entry.source, kind = %entry.kind, message = %entry.message, "Audit entry");
        self.entries.push(entry);
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

    /// Entries in insertion (timestamp) order.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    /// Display convenience for consoles that render newest entries on top.
    pub fn newest_first(&self) -> Vec<LogEntry> {
        let mut entries = self.entries.clone();
        entries.reverse();
        entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
