use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ControlError;
use crate::manifest::AgentManifest;

/// Replacement thought text when a stream fails mid-flight. The step itself
/// proceeds; the failure is recovered locally.
pub const THOUGHT_FAILURE_MARKER: &str = "[Thought process failed to generate.]";

#[derive(Debug, Clone)]
pub struct ThoughtRequest {
    pub agent: AgentManifest,
    pub task: String,
    pub objective: String,
    pub model: String,
}

/// Lazy, finite sequence of thought chunks for one agent working one task.
/// Consumption is best-effort enrichment of agent state and never gates step
/// completion. An `Err` chunk terminates the stream.
#[async_trait]
pub trait ThoughtSource: Send + Sync {
    async fn stream_thoughts(
        &self,
        request: ThoughtRequest,
    ) -> mpsc::Receiver<Result<String, ControlError>>;
}

/// Canned thought stream with small inter-chunk delays, enough to make the
/// incremental consumption observable in the simulation.
#[derive(Debug)]
pub struct ScriptedThoughts {
    chunk_delay: Duration,
}

impl Default for ScriptedThoughts {
    fn default() -> Self {
        Self {
            chunk_delay: Duration::from_millis(150),
        }
    }
}

impl ScriptedThoughts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }
}

#[async_trait]
impl ThoughtSource for ScriptedThoughts {
    async fn stream_thoughts(
        &self,
        request: ThoughtRequest,
    ) -> mpsc::Receiver<Result<String, ControlError>> {
        let (tx, rx) = mpsc::channel(8);
        let delay = self.chunk_delay;

        tokio::spawn(async move {
            let chunks = [
                format!("Taking on \"{}\". ", request.task),
                format!(
                    "The mission objective is \"{}\", so I will focus on what moves it forward. ",
                    request.objective
                ),
                "Breaking the work into verifiable pieces. ".to_string(),
                "Reporting results to shared memory when done.".to_string(),
            ];
            for chunk in chunks {
                // Receiver dropped means the consumer moved on; stop quietly.
                if tx.send(Ok(chunk)).await.is_err() {
                    return;
                }
                tokio::time::sleep(delay).await;
            }
        });

        rx
    }
}

/// Thought source that always fails after one chunk. Exercises the recovery
/// path in tests and demos.
#[derive(Debug, Default)]
pub struct FailingThoughts;

#[async_trait]
impl ThoughtSource for FailingThoughts {
    async fn stream_thoughts(
        &self,
        _request: ThoughtRequest,
    ) -> mpsc::Receiver<Result<String, ControlError>> {
        let (tx, rx) = mpsc::channel(2);
        tokio::spawn(async move {
            let _ = tx.send(Ok("Starting on the task. ".to_string())).await;
            let _ = tx
                .send(Err(ControlError::ThoughtStream(
                    "stream interrupted".to_string(),
                )))
                .await;
        });
        rx
    }
}
