//! Quota policy configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Quota policy applied by the admission gatekeeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Seconds granted to a token on its first admission check of a month.
    #[serde(default = "default_seconds")]
    pub default_seconds: i64,
    /// Safety-net expiry of the session-to-token mapping, in seconds.
    #[serde(default = "default_mapping_ttl")]
    pub mapping_ttl_seconds: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_seconds: default_seconds(),
            mapping_ttl_seconds: default_mapping_ttl(),
        }
    }
}

impl QuotaConfig {
    /// Mapping expiry as a [`Duration`].
    pub fn mapping_ttl(&self) -> Duration {
        Duration::from_secs(self.mapping_ttl_seconds)
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.default_seconds <= 0 {
            return Err(AppError::configuration(
                "quota.default_seconds must be positive",
            ));
        }
        if self.mapping_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "quota.mapping_ttl_seconds must be positive",
            ));
        }
        Ok(())
    }
}

fn default_seconds() -> i64 {
    120
}

fn default_mapping_ttl() -> u64 {
    2 * 60 * 60
}
