//! Pool monitor: the state machine behind a worker pool.
//!
//! # States
//! - Disconnected: no live worker tracked; `select` fails fast
//! - Connected: at least one live worker tracked
//!
//! # State Transitions
//! ```text
//! Disconnected → Connected:    connect lists >= 1 worker
//! Connected → Disconnected:    supervisor unreachable, lists 0 workers,
//!                              or the last tracked worker dies
//! Connected → Connected:       a worker dies (table shrinks in place)
//! Connected → resync:          alive / original < min_alive_ratio after a death
//! ```
//!
//! # Design Decisions
//! - One task, one mailbox: requests and internal events share a queue
//! - Connect is additive; only death or an unreachable supervisor evicts
//! - The baseline count is taken only from a connect that found workers
//! - The ratio comparison is strict, equal to the threshold keeps the pool

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use crate::config::PoolConfig;
use crate::observability::metrics;
use crate::pool::error::PoolError;
use crate::pool::handle::{PoolHandle, PoolStatus};
use crate::pool::liveness::{LivenessWatch, WatchToken};
use crate::pool::reconnect::ReconnectScheduler;
use crate::pool::table::WorkerTable;
use crate::pool::worker::{WorkerEntry, WorkerId};
use crate::supervisor::{Liveness, Supervisor};

const MAILBOX_CAPACITY: usize = 256;

/// Everything the monitor loop consumes, in arrival order.
pub(crate) enum Message {
    Select {
        reply: oneshot::Sender<Result<WorkerId, PoolError>>,
    },
    /// `reply` is `None` for the start-up connect.
    Connect {
        reply: Option<oneshot::Sender<Result<(), PoolError>>>,
    },
    /// Connect, then report the tracked workers.
    Refresh {
        reply: oneshot::Sender<Vec<WorkerId>>,
    },
    Status {
        reply: oneshot::Sender<PoolStatus>,
    },
    WorkerTerminated {
        id: WorkerId,
        token: WatchToken,
    },
    ReconnectTimerFired,
}

/// Tuning for a single pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSettings {
    /// Resync when `alive / original` drops strictly below this.
    pub min_alive_ratio: f64,
    /// Delay before retrying an unreachable or empty supervisor.
    pub reconnect_delay: Duration,
    /// Enqueue a connect as the very first operation.
    pub connect_at_start: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_alive_ratio: 0.5,
            reconnect_delay: Duration::from_millis(1000),
            connect_at_start: true,
        }
    }
}

impl From<&PoolConfig> for PoolSettings {
    fn from(config: &PoolConfig) -> Self {
        Self {
            min_alive_ratio: config.min_alive_ratio,
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            connect_at_start: config.connect_at_start,
        }
    }
}

/// State owned by a pool's event loop.
pub struct PoolMonitor {
    name: Arc<str>,
    supervisor: Arc<dyn Supervisor>,
    liveness: Arc<dyn Liveness>,
    settings: PoolSettings,
    table: WorkerTable<WorkerEntry>,
    connected: bool,
    last_selected: Option<WorkerId>,
    original_count: Option<usize>,
    reconnect: ReconnectScheduler,
    events: mpsc::WeakSender<Message>,
    next_token: WatchToken,
}

impl PoolMonitor {
    /// Start a monitor whose supervisor also reports worker liveness.
    pub fn start<S>(
        name: impl Into<String>,
        supervisor: Arc<S>,
        settings: PoolSettings,
        shutdown: broadcast::Receiver<()>,
    ) -> PoolHandle
    where
        S: Supervisor + Liveness + 'static,
    {
        let liveness: Arc<dyn Liveness> = supervisor.clone();
        Self::start_with(name, supervisor, liveness, settings, shutdown)
    }

    /// Start a monitor with separate supervisor and liveness collaborators.
    ///
    /// The loop runs until every [`PoolHandle`] is dropped or `shutdown` fires.
    pub fn start_with(
        name: impl Into<String>,
        supervisor: Arc<dyn Supervisor>,
        liveness: Arc<dyn Liveness>,
        settings: PoolSettings,
        shutdown: broadcast::Receiver<()>,
    ) -> PoolHandle {
        let name: Arc<str> = Arc::from(name.into());
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);

        if settings.connect_at_start {
            // Fresh channel, cannot be full.
            let _ = tx.try_send(Message::Connect { reply: None });
        }

        let events = tx.downgrade();
        let monitor = Self {
            name: name.clone(),
            supervisor,
            liveness,
            reconnect: ReconnectScheduler::new(settings.reconnect_delay, events.clone()),
            settings,
            table: WorkerTable::new(),
            connected: false,
            last_selected: None,
            original_count: None,
            events,
            next_token: WatchToken::default(),
        };

        tokio::spawn(monitor.run(rx, shutdown));
        PoolHandle::new(name, tx)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Message>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            pool = %self.name,
            min_alive_ratio = self.settings.min_alive_ratio,
            reconnect_delay_ms = self.settings.reconnect_delay.as_millis() as u64,
            "Pool monitor starting"
        );

        let mut listening = true;
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => self.handle(msg).await,
                    None => {
                        tracing::debug!(pool = %self.name, "All pool handles dropped");
                        break;
                    }
                },
                signal = shutdown.recv(), if listening => match signal {
                    // Coordinator gone without triggering; keep serving handles.
                    Err(broadcast::error::RecvError::Closed) => listening = false,
                    _ => {
                        tracing::info!(pool = %self.name, "Pool monitor received shutdown signal, exiting loop");
                        break;
                    }
                },
            }
        }

        self.teardown();
    }

    async fn handle(&mut self, msg: Message) {
        match msg {
            Message::Select { reply } => {
                let _ = reply.send(self.select());
            }
            Message::Connect { reply } => {
                self.connect().await;
                if let Some(reply) = reply {
                    let result = if self.connected {
                        Ok(())
                    } else {
                        Err(PoolError::NotConnected)
                    };
                    let _ = reply.send(result);
                }
            }
            Message::Refresh { reply } => {
                self.connect().await;
                let _ = reply.send(self.table.ids());
            }
            Message::Status { reply } => {
                let _ = reply.send(self.status());
            }
            Message::WorkerTerminated { id, token } => {
                self.worker_terminated(id, token).await;
            }
            Message::ReconnectTimerFired => {
                self.reconnect.fired();
                tracing::debug!(pool = %self.name, "Reconnect timer fired");
                metrics::record_resync(&self.name, "timer");
                self.connect().await;
            }
        }
    }

    /// Refresh the table from the supervisor.
    async fn connect(&mut self) {
        let children = match self.supervisor.list_children().await {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!(
                    pool = %self.name,
                    error = %e,
                    delay_ms = self.reconnect.delay().as_millis() as u64,
                    "Supervisor unavailable, clearing pool"
                );
                self.table.clear();
                self.last_selected = None;
                self.set_connected(false);
                self.schedule_reconnect();
                metrics::record_pool_size(&self.name, 0);
                return;
            }
        };

        let liveness = &self.liveness;
        let events = &self.events;
        let next_token = &mut self.next_token;
        let mut added = 0usize;
        for id in children {
            let inserted = self.table.insert_with(id, |id| {
                let watch = LivenessWatch::spawn(id.clone(), next_token.bump(), liveness.clone(), events.clone());
                WorkerEntry::new(watch)
            });
            if inserted {
                added += 1;
            }
        }

        self.last_selected = self.table.first().cloned();
        metrics::record_pool_size(&self.name, self.table.len());

        if self.table.is_empty() {
            tracing::warn!(pool = %self.name, "Supervisor reported no workers");
            self.set_connected(false);
            self.schedule_reconnect();
        } else {
            self.original_count = Some(self.table.len());
            self.set_connected(true);
            tracing::info!(pool = %self.name, workers = self.table.len(), added, "Pool connected");
        }
    }

    fn select(&mut self) -> Result<WorkerId, PoolError> {
        if !self.connected {
            return Err(PoolError::Disconnected);
        }

        let next = self
            .table
            .cyclic_next(self.last_selected.as_ref())
            .cloned()
            .ok_or(PoolError::Disconnected)?;

        tracing::trace!(pool = %self.name, worker = %next, "Worker selected");
        metrics::record_selection(&self.name);
        self.last_selected = Some(next.clone());
        Ok(next)
    }

    async fn worker_terminated(&mut self, id: WorkerId, token: WatchToken) {
        let current = self.table.get(&id).is_some_and(|entry| entry.token() == token);
        if !current {
            tracing::debug!(pool = %self.name, worker = %id, "Ignoring termination of untracked worker");
            return;
        }

        self.table.remove(&id);
        metrics::record_worker_termination(&self.name);
        metrics::record_pool_size(&self.name, self.table.len());

        if let Some(ratio) = self.health_ratio() {
            if ratio < self.settings.min_alive_ratio {
                tracing::info!(
                    pool = %self.name,
                    worker = %id,
                    alive = self.table.len(),
                    original = self.original_count.unwrap_or_default(),
                    ratio,
                    "Live workers below minimum ratio, resyncing"
                );
                metrics::record_resync(&self.name, "below_ratio");
                self.connect().await;
                return;
            }
        }

        if self.table.is_empty() {
            tracing::warn!(pool = %self.name, worker = %id, "Last worker terminated");
            self.set_connected(false);
            self.schedule_reconnect();
        } else {
            tracing::debug!(pool = %self.name, worker = %id, alive = self.table.len(), "Worker terminated");
        }
    }

    /// `alive / original`, once a connect has found workers.
    fn health_ratio(&self) -> Option<f64> {
        match self.original_count {
            Some(original) if original > 0 => Some(self.table.len() as f64 / original as f64),
            _ => None,
        }
    }

    fn schedule_reconnect(&mut self) {
        if self.reconnect.arm() {
            tracing::info!(
                pool = %self.name,
                delay_ms = self.reconnect.delay().as_millis() as u64,
                "Reconnect scheduled"
            );
        } else {
            tracing::debug!(pool = %self.name, "Reconnect already pending");
        }
    }

    fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            tracing::info!(pool = %self.name, connected, "Pool connection state changed");
        }
        self.connected = connected;
        metrics::record_connected(&self.name, connected);
    }

    fn status(&self) -> PoolStatus {
        PoolStatus {
            name: self.name.to_string(),
            connected: self.connected,
            workers: self.table.ids(),
            original_count: self.original_count,
            last_selected: self.last_selected.clone(),
            health_ratio: self.health_ratio(),
            reconnect_pending: self.reconnect.is_pending(),
        }
    }

    fn teardown(mut self) {
        let released = self.table.len();
        self.table.clear();
        self.set_connected(false);
        tracing::info!(pool = %self.name, released, "Pool monitor stopped");
    }
}
