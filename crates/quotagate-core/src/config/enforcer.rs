//! Enforcement sweep configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Periodic billing/eviction sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcerConfig {
    /// Whether this process runs the sweep at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweeps.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Quota seconds billed per active session per sweep.
    #[serde(default = "default_cost")]
    pub cost_per_tick: i64,
    /// TTL of the cross-process sweep lease.
    #[serde(default = "default_lease_ttl")]
    pub lease_ttl_seconds: u64,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            cost_per_tick: default_cost(),
            lease_ttl_seconds: default_lease_ttl(),
        }
    }
}

impl EnforcerConfig {
    /// Sweep interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Lease TTL.
    pub fn lease_ttl(&self) -> Duration {
        Duration::from_secs(self.lease_ttl_seconds)
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.interval_seconds == 0 {
            return Err(AppError::configuration(
                "enforcer.interval_seconds must be positive",
            ));
        }
        if self.cost_per_tick <= 0 {
            return Err(AppError::configuration(
                "enforcer.cost_per_tick must be positive",
            ));
        }
        if self.lease_ttl_seconds <= self.interval_seconds {
            return Err(AppError::configuration(format!(
                "enforcer.lease_ttl_seconds ({}) must exceed interval_seconds ({})",
                self.lease_ttl_seconds, self.interval_seconds
            )));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    5
}

fn default_cost() -> i64 {
    5
}

fn default_lease_ttl() -> u64 {
    30
}
