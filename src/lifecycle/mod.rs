//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Start supervisors → Start pool monitors
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Monitors release watches and exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then pools, then admin API
//! - Monitors also stop on their own once every handle is dropped

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
