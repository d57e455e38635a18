//! Caller-side handle to a running pool monitor.

use std::future::Future;
use std::sync::Arc;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use crate::pool::error::PoolError;
use crate::pool::monitor::Message;
use crate::pool::worker::WorkerId;

/// Point-in-time view of a pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolStatus {
    pub name: String,
    pub connected: bool,
    /// Tracked workers in table order.
    pub workers: Vec<WorkerId>,
    /// Worker count captured by the last connect that found workers.
    pub original_count: Option<usize>,
    pub last_selected: Option<WorkerId>,
    pub health_ratio: Option<f64>,
    pub reconnect_pending: bool,
}

/// Cloneable handle to a pool monitor.
///
/// Every call is queued behind whatever the monitor is already processing.
/// The monitor stops once the last handle is dropped.
#[derive(Debug, Clone)]
pub struct PoolHandle {
    name: Arc<str>,
    tx: mpsc::Sender<Message>,
}

impl PoolHandle {
    pub(crate) fn new(name: Arc<str>, tx: mpsc::Sender<Message>) -> Self {
        Self { name, tx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// False once the monitor loop has exited.
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Next live worker in round-robin order.
    pub async fn select(&self) -> Result<WorkerId, PoolError> {
        self.request(|reply| Message::Select { reply }).await?
    }

    /// Force a connect. Fails with [`PoolError::NotConnected`] if no worker is live afterwards.
    pub async fn connect(&self) -> Result<(), PoolError> {
        self.request(|reply| Message::Connect { reply: Some(reply) }).await?
    }

    /// Refresh from the supervisor, then apply `f` to every tracked worker
    /// in table order. The first error from `f` is returned as-is.
    pub async fn map_over_workers<F, Fut, T, E>(&self, mut f: F) -> Result<Vec<T>, E>
    where
        F: FnMut(WorkerId) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<PoolError>,
    {
        let workers = self.request(|reply| Message::Refresh { reply }).await?;

        let mut results = Vec::with_capacity(workers.len());
        for worker in workers {
            results.push(f(worker).await?);
        }
        Ok(results)
    }

    pub async fn status(&self) -> Result<PoolStatus, PoolError> {
        self.request(|reply| Message::Status { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Message) -> Result<T, PoolError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await.map_err(|_| PoolError::Stopped)?;
        rx.await.map_err(|_| PoolError::Stopped)
    }
}
