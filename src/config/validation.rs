//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ratios in [0, 1], delays > 0)
//! - Detect duplicate pool names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DaemonConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use crate::config::schema::DaemonConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("pool #{index} has an empty name")]
    EmptyPoolName { index: usize },

    #[error("pool '{0}' is defined more than once")]
    DuplicatePool(String),

    #[error("pool '{pool}': min_alive_ratio {ratio} must be within 0.0..=1.0")]
    RatioOutOfRange { pool: String, ratio: f64 },

    #[error("pool '{0}': reconnect_delay_ms must be greater than 0")]
    ZeroReconnectDelay(String),

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DaemonConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, pool) in config.pools.iter().enumerate() {
        if pool.name.trim().is_empty() {
            errors.push(ValidationError::EmptyPoolName { index });
        } else if !seen.insert(pool.name.as_str()) {
            errors.push(ValidationError::DuplicatePool(pool.name.clone()));
        }

        // NaN fails the range check too.
        if !(0.0..=1.0).contains(&pool.min_alive_ratio) {
            errors.push(ValidationError::RatioOutOfRange {
                pool: pool.name.clone(),
                ratio: pool.min_alive_ratio,
            });
        }

        if pool.reconnect_delay_ms == 0 {
            errors.push(ValidationError::ZeroReconnectDelay(pool.name.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PoolConfig;

    fn pool(name: &str, ratio: f64, delay: u64) -> PoolConfig {
        PoolConfig {
            name: name.to_string(),
            min_alive_ratio: ratio,
            reconnect_delay_ms: delay,
            connect_at_start: true,
            local_workers: 1,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DaemonConfig::default()).is_ok());
    }

    #[test]
    fn test_ratio_bounds_inclusive() {
        let mut config = DaemonConfig::default();
        config.pools.push(pool("zero", 0.0, 10));
        config.pools.push(pool("one", 1.0, 10));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = DaemonConfig::default();
        config.pools.push(pool("web", 1.5, 10));
        config.pools.push(pool("web", f64::NAN, 0));
        config.pools.push(pool(" ", 0.5, 10));
        config.admin.enabled = true;
        config.admin.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6, "{errors:?}");
        assert!(errors.contains(&ValidationError::DuplicatePool("web".into())));
        assert!(errors.contains(&ValidationError::ZeroReconnectDelay("web".into())));
        assert!(errors.contains(&ValidationError::EmptyPoolName { index: 2 }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidAddress { field: "admin.bind_address", .. })));
    }

    #[test]
    fn test_disabled_metrics_address_not_checked() {
        let mut config = DaemonConfig::default();
        config.observability.metrics_address = "garbage".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
