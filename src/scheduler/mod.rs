//! Cancellable timed scheduling for step-to-step advancement.
//!
//! Every mission cycle runs under a generation-stamped token. Superseding a
//! cycle (abort, fatal failure, fresh deploy) bumps the generation, which
//! both wakes any in-flight sleep and invalidates late collaborator results
//! so stale timers never mutate state the mission has moved past.

mod failure;

use std::time::Duration;

use tokio::sync::watch;

pub use failure::should_fail;

#[derive(Debug)]
pub struct Scheduler {
    generation: watch::Sender<u64>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    /// Token bound to the current generation. It stays valid until the next
    /// `cancel_pending` call.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            issued: *self.generation.borrow(),
            rx: self.generation.subscribe(),
        }
    }

    /// Invalidates every outstanding token and wakes their pending sleeps.
    pub fn cancel_pending(&self) {
        self.generation.send_modify(|g| *g += 1);
    }
}

#[derive(Debug, Clone)]
pub struct CancellationToken {
    issued: u64,
    rx: watch::Receiver<u64>,
}

impl CancellationToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() != self.issued
    }

    /// Sleeps for `delay`, returning `false` if the token was cancelled
    /// before or during the wait.
    pub async fn sleep(&mut self, delay: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return !self.is_cancelled(),
                changed = self.rx.changed() => {
                    if changed.is_err() || self.is_cancelled() {
                        return false;
                    }
                }
            }
        }
    }
}
