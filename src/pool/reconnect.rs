//! Delayed reconnect scheduling.
//!
//! # Responsibilities
//! - Arm a one-shot timer that asks the monitor to reconnect
//! - Keep at most one timer outstanding per monitor
//!
//! # Design Decisions
//! - Fixed delay, no backoff: the supervisor decides how long it stays away
//! - A pending timer is not cancelled by a successful connect
//! - The timer stays "pending" until the monitor processes the fired event

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::pool::monitor::Message;

/// One-shot reconnect timer owned by a pool monitor.
#[derive(Debug)]
pub struct ReconnectScheduler {
    delay: Duration,
    events: mpsc::WeakSender<Message>,
    pending: Option<JoinHandle<()>>,
}

impl ReconnectScheduler {
    pub(crate) fn new(delay: Duration, events: mpsc::WeakSender<Message>) -> Self {
        Self {
            delay,
            events,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer unless one is already outstanding.
    ///
    /// Returns true if a new timer was started.
    pub fn arm(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }

        let events = self.events.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(Message::ReconnectTimerFired).await;
            }
        }));
        true
    }

    /// Mark the outstanding timer as consumed.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for ReconnectScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}
