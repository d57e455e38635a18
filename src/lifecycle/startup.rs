//! Startup orchestration.
//!
//! # Responsibilities
//! - Start one local supervisor per configured pool
//! - Start and register a pool monitor for each
//!
//! # Design Decisions
//! - Fail fast: a duplicate pool name aborts startup
//! - Pools start in config order; none waits for another to connect

use std::collections::BTreeMap;
use std::sync::Arc;
use crate::config::DaemonConfig;
use crate::lifecycle::Shutdown;
use crate::pool::{PoolError, PoolRegistry, PoolSettings};
use crate::supervisor::LocalSupervisor;

/// Everything `start_pools` brought up.
pub struct StartedPools {
    pub registry: PoolRegistry,
    /// Local supervisor backing each pool, by pool name.
    pub supervisors: BTreeMap<String, Arc<LocalSupervisor>>,
}

/// Start every pool in `config`, each backed by its own local supervisor.
pub fn start_pools(config: &DaemonConfig, shutdown: &Shutdown) -> Result<StartedPools, PoolError> {
    let registry = PoolRegistry::new();
    let mut supervisors = BTreeMap::new();

    for pool in &config.pools {
        let supervisor = Arc::new(LocalSupervisor::with_children(pool.name.clone(), pool.local_workers));
        registry.start_pool(
            &pool.name,
            supervisor.clone(),
            PoolSettings::from(pool),
            shutdown.subscribe(),
        )?;
        tracing::info!(
            pool = %pool.name,
            workers = pool.local_workers,
            min_alive_ratio = pool.min_alive_ratio,
            reconnect_delay_ms = pool.reconnect_delay_ms,
            "Pool started"
        );
        supervisors.insert(pool.name.clone(), supervisor);
    }

    Ok(StartedPools { registry, supervisors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use crate::config::PoolConfig;

    #[tokio::test]
    async fn test_start_pools_from_config() {
        let config = parse_config(
            r#"
            [[pools]]
            name = "web"
            local_workers = 3

            [[pools]]
            name = "batch"
            local_workers = 1
            "#,
        )
        .unwrap();
        let shutdown = Shutdown::new();

        let started = start_pools(&config, &shutdown).unwrap();
        assert_eq!(started.registry.names(), vec!["batch".to_string(), "web".to_string()]);
        assert_eq!(started.supervisors["web"].children().len(), 3);

        let status = started.registry.status("web").await.unwrap();
        assert!(status.connected);
        assert_eq!(status.original_count, Some(3));
    }

    #[tokio::test]
    async fn test_duplicate_pool_fails_startup() {
        // Bypasses validation on purpose.
        let mut config = DaemonConfig::default();
        for _ in 0..2 {
            config.pools.push(PoolConfig {
                name: "web".into(),
                min_alive_ratio: 0.5,
                reconnect_delay_ms: 100,
                connect_at_start: true,
                local_workers: 1,
            });
        }

        let shutdown = Shutdown::new();
        assert!(matches!(
            start_pools(&config, &shutdown),
            Err(PoolError::AlreadyRegistered(_))
        ));
    }
}
