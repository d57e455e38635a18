//! Supervisor collaborators.
//!
//! # Data Flow
//! ```text
//! PoolMonitor connect / resync
//!     → Supervisor::list_children (authoritative worker list)
//!     → Liveness::wait_terminated per newly tracked worker
//!     → termination event back into the monitor
//! ```
//!
//! # Design Decisions
//! - The supervisor owns the workers; the pool only observes them
//! - Bounding `list_children` is the implementor's job; the monitor awaits it inline
//! - `local.rs` provides an in-process implementation of both traits

use async_trait::async_trait;
use crate::pool::worker::WorkerId;

pub mod local;

pub use local::LocalSupervisor;

/// Errors reported by a supervisor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SupervisorError {
    #[error("supervisor is not running")]
    NotRunning,
}

/// Source of the authoritative worker list.
#[async_trait]
pub trait Supervisor: Send + Sync {
    /// Current children of the supervisor.
    async fn list_children(&self) -> Result<Vec<WorkerId>, SupervisorError>;
}

/// Runtime hook for observing worker termination.
#[async_trait]
pub trait Liveness: Send + Sync {
    /// Resolve once `worker` has stopped.
    ///
    /// Must resolve immediately for a worker that is unknown or already gone.
    async fn wait_terminated(&self, worker: &WorkerId);
}
