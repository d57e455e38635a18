//! Caller-facing pool errors.

/// Errors returned by pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No live worker is available right now; retry later.
    #[error("pool is disconnected: no live worker available")]
    Disconnected,

    /// An explicit connect found no live worker.
    #[error("pool could not connect to any worker")]
    NotConnected,

    /// The monitor task has exited.
    #[error("pool monitor is not running")]
    Stopped,

    #[error("unknown pool: {0}")]
    UnknownPool(String),

    #[error("pool already registered: {0}")]
    AlreadyRegistered(String),
}
