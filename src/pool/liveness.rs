//! Per-worker liveness watches.
//!
//! # Responsibilities
//! - Await the runtime's termination signal for one worker
//! - Deliver exactly one termination event to the owning monitor
//! - Release the subscription when the worker leaves the table
//!
//! # Design Decisions
//! - Watch tasks hold a weak sender and never keep a monitor alive
//! - Every watch carries a token so late events for a removed entry are dropped

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::pool::monitor::Message;
use crate::pool::worker::WorkerId;
use crate::supervisor::Liveness;

/// Identifies one watch registration within a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchToken(u64);

impl WatchToken {
    /// Return the current token and advance to the next one.
    pub(crate) fn bump(&mut self) -> WatchToken {
        let current = *self;
        self.0 += 1;
        current
    }
}

/// Cancellable subscription to a worker's termination.
///
/// Dropping the watch aborts the underlying task.
#[derive(Debug)]
pub struct LivenessWatch {
    token: WatchToken,
    task: JoinHandle<()>,
}

impl LivenessWatch {
    /// Start watching `worker`. On termination a `WorkerTerminated` event
    /// tagged with `token` is sent to `events`, if the monitor still exists.
    pub(crate) fn spawn(
        worker: WorkerId,
        token: WatchToken,
        liveness: Arc<dyn Liveness>,
        events: mpsc::WeakSender<Message>,
    ) -> Self {
        let task = tokio::spawn(async move {
            liveness.wait_terminated(&worker).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(Message::WorkerTerminated { id: worker, token }).await;
            }
        });
        Self { token, task }
    }

    pub fn token(&self) -> WatchToken {
        self.token
    }

    /// True once the termination event has been delivered (or the watch was aborted).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LivenessWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
