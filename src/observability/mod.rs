//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pool monitors, supervisors, admin API produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Pool name flows through every event as a field/label
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
