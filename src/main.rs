//! Worker pool monitor daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   select / connect            ┌──────────────────────────────────────────┐
//!   ───────────────────────────▶│ admin API (axum) → PoolRegistry          │
//!                               │                       │ name → handle    │
//!                               │                       ▼                  │
//!                               │  ┌────────────────────────────────────┐  │
//!                               │  │ PoolMonitor (one task per pool)    │  │
//!                               │  │  WorkerTable · LivenessWatch ·     │  │
//!                               │  │  ReconnectScheduler                │  │
//!                               │  └──────────────┬─────────────────────┘  │
//!                               │                 │ list_children / watch  │
//!                               │                 ▼                        │
//!                               │        LocalSupervisor (children)        │
//!                               └──────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use tokio::net::TcpListener;
use worker_pool_monitor::admin::{setup_admin_router, AdminState};
use worker_pool_monitor::config::loader::load_config;
use worker_pool_monitor::config::DaemonConfig;
use worker_pool_monitor::lifecycle::{signals, startup, Shutdown};
use worker_pool_monitor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "worker-pool-monitor")]
#[command(about = "Round-robin front for supervised worker pools", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => DaemonConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("worker-pool-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    if config.pools.is_empty() {
        tracing::warn!("No pools configured");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let started = startup::start_pools(&config, &shutdown)?;

    let admin_task = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Admin API listening");

        let router = setup_admin_router(AdminState::new(
            started.registry.clone(),
            config.admin.api_key.clone(),
        ));
        let mut stop = shutdown.subscribe();
        Some(tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = stop.recv().await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "Admin API failed");
            }
        }))
    } else {
        None
    };

    signals::wait_for_shutdown_signal().await;
    tracing::info!("Shutting down");
    shutdown.trigger();

    if let Some(task) = admin_task {
        let _ = task.await;
    }
    drop(started);

    tracing::info!("Shutdown complete");
    Ok(())
}
