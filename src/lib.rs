//! Resilient round-robin front for a supervised worker pool.

pub mod config;
pub mod pool;
pub mod supervisor;
pub mod lifecycle;
pub mod observability;
pub mod admin;

pub use config::schema::DaemonConfig;
pub use lifecycle::Shutdown;
pub use pool::{PoolError, PoolHandle, PoolMonitor, PoolRegistry, PoolSettings, PoolStatus, WorkerId};
pub use supervisor::{Liveness, LocalSupervisor, Supervisor, SupervisorError};
