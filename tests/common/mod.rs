//! Shared utilities for pool integration tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use worker_pool_monitor::{
    Liveness, LocalSupervisor, PoolHandle, PoolMonitor, PoolSettings, PoolStatus, Shutdown,
    Supervisor, SupervisorError, WorkerId,
};

/// Local supervisor that counts `list_children` calls and can leave
/// live children out of its listing.
pub struct CountingSupervisor {
    pub local: LocalSupervisor,
    calls: AtomicUsize,
    hidden: Mutex<HashSet<WorkerId>>,
}

impl CountingSupervisor {
    pub fn new(children: &[&str]) -> Arc<Self> {
        let local = LocalSupervisor::new("test");
        for id in children {
            local.spawn_named(*id);
        }
        Arc::new(Self {
            local,
            calls: AtomicUsize::new(0),
            hidden: Mutex::new(HashSet::new()),
        })
    }

    pub fn list_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Omit a still-running child from future listings.
    #[allow(dead_code)]
    pub fn hide(&self, id: &str) {
        self.hidden.lock().unwrap().insert(WorkerId::from(id));
    }

    pub fn kill(&self, id: &str) {
        assert!(self.local.terminate(&WorkerId::from(id)), "{id} was not running");
    }
}

#[async_trait]
impl Supervisor for CountingSupervisor {
    async fn list_children(&self) -> Result<Vec<WorkerId>, SupervisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let children = self.local.list_children().await?;
        let hidden = self.hidden.lock().unwrap();
        Ok(children.into_iter().filter(|c| !hidden.contains(c)).collect())
    }
}

#[async_trait]
impl Liveness for CountingSupervisor {
    async fn wait_terminated(&self, worker: &WorkerId) {
        self.local.wait_terminated(worker).await
    }
}

pub fn settings(min_alive_ratio: f64, reconnect_delay_ms: u64) -> PoolSettings {
    PoolSettings {
        min_alive_ratio,
        reconnect_delay: Duration::from_millis(reconnect_delay_ms),
        connect_at_start: true,
    }
}

/// Start a pool named "test" over `supervisor`.
pub fn start(supervisor: &Arc<CountingSupervisor>, settings: PoolSettings, shutdown: &Shutdown) -> PoolHandle {
    PoolMonitor::start("test", supervisor.clone(), settings, shutdown.subscribe())
}

pub fn ids(names: &[&str]) -> Vec<WorkerId> {
    names.iter().map(|n| WorkerId::from(*n)).collect()
}

/// Poll the pool status until `check` holds.
pub async fn wait_for_status<F>(pool: &PoolHandle, what: &str, mut check: F) -> PoolStatus
where
    F: FnMut(&PoolStatus) -> bool,
{
    for _ in 0..400 {
        let status = pool.status().await.expect("pool monitor stopped");
        if check(&status) {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for: {what}");
}

/// Poll a synchronous condition.
#[allow(dead_code)]
pub async fn wait_until<F>(what: &str, mut check: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for: {what}");
}
