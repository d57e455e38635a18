//! Pool registry.
//!
//! # Responsibilities
//! - Map logical pool names to running monitors
//! - Start pools under a unique name
//! - Route named operations to the right handle

use std::future::Future;
use std::sync::Arc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;
use crate::pool::error::PoolError;
use crate::pool::handle::{PoolHandle, PoolStatus};
use crate::pool::monitor::{PoolMonitor, PoolSettings};
use crate::pool::worker::WorkerId;
use crate::supervisor::{Liveness, Supervisor};

/// Name → handle lookup owned by the hosting application.
///
/// Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: Arc<DashMap<String, PoolHandle>>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a monitor and register it under `name`.
    pub fn start_pool<S>(
        &self,
        name: &str,
        supervisor: Arc<S>,
        settings: PoolSettings,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<PoolHandle, PoolError>
    where
        S: Supervisor + Liveness + 'static,
    {
        match self.pools.entry(name.to_string()) {
            Entry::Occupied(_) => Err(PoolError::AlreadyRegistered(name.to_string())),
            Entry::Vacant(slot) => {
                let handle = PoolMonitor::start(name, supervisor, settings, shutdown);
                slot.insert(handle.clone());
                tracing::info!(pool = %name, "Pool registered");
                Ok(handle)
            }
        }
    }

    /// Register an already running monitor.
    pub fn register(&self, handle: PoolHandle) -> Result<(), PoolError> {
        match self.pools.entry(handle.name().to_string()) {
            Entry::Occupied(_) => Err(PoolError::AlreadyRegistered(handle.name().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<PoolHandle, PoolError> {
        self.pools
            .get(name)
            .map(|h| h.value().clone())
            .ok_or_else(|| PoolError::UnknownPool(name.to_string()))
    }

    /// Unregister a pool. Its monitor stops once other handle clones are gone.
    pub fn remove(&self, name: &str) -> Option<PoolHandle> {
        self.pools.remove(name).map(|(_, handle)| handle)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.iter().map(|p| p.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub async fn select(&self, name: &str) -> Result<WorkerId, PoolError> {
        self.get(name)?.select().await
    }

    pub async fn connect(&self, name: &str) -> Result<(), PoolError> {
        self.get(name)?.connect().await
    }

    pub async fn map_over_workers<F, Fut, T, E>(&self, name: &str, f: F) -> Result<Vec<T>, E>
    where
        F: FnMut(WorkerId) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<PoolError>,
    {
        self.get(name)?.map_over_workers(f).await
    }

    pub async fn status(&self, name: &str) -> Result<PoolStatus, PoolError> {
        self.get(name)?.status().await
    }

    /// Status of every running pool, sorted by name.
    pub async fn statuses(&self) -> Vec<PoolStatus> {
        let mut statuses = Vec::new();
        for name in self.names() {
            match self.status(&name).await {
                Ok(status) => statuses.push(status),
                Err(e) => tracing::debug!(pool = %name, error = %e, "Skipping pool status"),
            }
        }
        statuses
    }
}
