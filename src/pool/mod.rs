//! Worker pool subsystem.
//!
//! # Data Flow
//! ```text
//! Caller: select / connect / map_over_workers / status
//!     → handle.rs (PoolHandle queues a Message with a oneshot reply)
//!     → monitor.rs (single event loop, owns all pool state)
//!         → table.rs (ordered live-worker set, cyclic cursor)
//!         → liveness.rs (one watch task per worker → WorkerTerminated)
//!         → reconnect.rs (one-shot timer → ReconnectTimerFired)
//!     → Supervisor::list_children on every (re)connect
//!
//! registry.rs: pool name → PoolHandle, owned by the application
//! ```
//!
//! # Design Decisions
//! - Requests and internal events share one queue, so transitions are totally ordered
//! - Internal producers hold weak senders; the loop ends with the last handle
//! - Round-robin over a sorted table; a vanished cursor restarts from the first worker
//! - Resync when alive/original drops strictly below `min_alive_ratio`
//! - At most one reconnect timer outstanding

pub mod error;
pub mod handle;
pub mod liveness;
pub mod monitor;
pub mod reconnect;
pub mod registry;
pub mod table;
pub mod worker;

pub use error::PoolError;
pub use handle::{PoolHandle, PoolStatus};
pub use monitor::{PoolMonitor, PoolSettings};
pub use registry::PoolRegistry;
pub use worker::WorkerId;
