//! In-process supervisor.
//!
//! # Responsibilities
//! - Own a set of named child workers
//! - Report them through `Supervisor::list_children`
//! - Signal termination to every watcher when a child is stopped
//!
//! # Design Decisions
//! - One `watch` channel per child; dropping the sender is the death signal
//! - A stopped supervisor keeps its children but refuses to list them

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use crate::pool::worker::WorkerId;
use crate::supervisor::{Liveness, Supervisor, SupervisorError};

/// Supervisor whose children live in the current process.
#[derive(Debug)]
pub struct LocalSupervisor {
    name: String,
    children: DashMap<WorkerId, watch::Sender<()>>,
    running: AtomicBool,
    next_child: AtomicU64,
}

impl LocalSupervisor {
    /// Create a running supervisor with no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: DashMap::new(),
            running: AtomicBool::new(true),
            next_child: AtomicU64::new(0),
        }
    }

    /// Create a running supervisor and spawn `count` children.
    pub fn with_children(name: impl Into<String>, count: usize) -> Self {
        let supervisor = Self::new(name);
        for _ in 0..count {
            supervisor.spawn_child();
        }
        supervisor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spawn a child with the next sequential id (`worker-0001`, ...).
    pub fn spawn_child(&self) -> WorkerId {
        let n = self.next_child.fetch_add(1, Ordering::Relaxed) + 1;
        let id = WorkerId::new(format!("worker-{:04}", n));
        self.spawn_named(id.clone());
        id
    }

    /// Spawn a child under an explicit id.
    ///
    /// Returns false if a live child already uses that id.
    pub fn spawn_named(&self, id: impl Into<WorkerId>) -> bool {
        let id = id.into();
        if self.children.contains_key(&id) {
            return false;
        }
        let (tx, _) = watch::channel(());
        self.children.insert(id.clone(), tx);
        tracing::debug!(supervisor = %self.name, worker = %id, "Child started");
        true
    }

    /// Stop a child. Every pending `wait_terminated` for it resolves.
    pub fn terminate(&self, id: &WorkerId) -> bool {
        let stopped = self.children.remove(id).is_some();
        if stopped {
            tracing::debug!(supervisor = %self.name, worker = %id, "Child terminated");
        }
        stopped
    }

    /// Toggle reachability. While stopped, `list_children` fails.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
        tracing::info!(supervisor = %self.name, running, "Supervisor availability changed");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Live children in id order.
    pub fn children(&self) -> Vec<WorkerId> {
        let mut ids: Vec<WorkerId> = self.children.iter().map(|c| c.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of active liveness watchers on a child.
    pub fn watcher_count(&self, id: &WorkerId) -> usize {
        self.children
            .get(id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Supervisor for LocalSupervisor {
    async fn list_children(&self) -> Result<Vec<WorkerId>, SupervisorError> {
        if !self.is_running() {
            return Err(SupervisorError::NotRunning);
        }
        Ok(self.children())
    }
}

#[async_trait]
impl Liveness for LocalSupervisor {
    async fn wait_terminated(&self, worker: &WorkerId) {
        let mut rx = match self.children.get(worker) {
            Some(tx) => tx.subscribe(),
            None => return,
        };
        // Only the sender ever closes the channel.
        while rx.changed().await.is_ok() {}
    }
}
