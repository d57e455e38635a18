//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pool_live_workers` (gauge): tracked workers per pool
//! - `pool_connected` (gauge): 1=connected, 0=disconnected
//! - `pool_resyncs_total` (counter): resyncs by pool and reason
//! - `pool_worker_terminations_total` (counter): observed worker deaths
//! - `pool_selections_total` (counter): successful selects
//!
//! Recording without an installed exporter is a no-op.

use std::net::SocketAddr;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_pool_size(pool: &str, workers: usize) {
    gauge!("pool_live_workers", "pool" => pool.to_string()).set(workers as f64);
}

pub fn record_connected(pool: &str, connected: bool) {
    gauge!("pool_connected", "pool" => pool.to_string()).set(if connected { 1.0 } else { 0.0 });
}

pub fn record_resync(pool: &str, reason: &'static str) {
    counter!("pool_resyncs_total", "pool" => pool.to_string(), "reason" => reason).increment(1);
}

pub fn record_worker_termination(pool: &str) {
    counter!("pool_worker_terminations_total", "pool" => pool.to_string()).increment(1);
}

pub fn record_selection(pool: &str) {
    counter!("pool_selections_total", "pool" => pool.to_string()).increment(1);
}
