//! Shared state store configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Top-level store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider type: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Prefix applied to every key. Empty keeps the bare key names
    /// (`active_sids:*`, `sid_to_token:*`, `remain:*`).
    #[serde(default)]
    pub key_prefix: String,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            key_prefix: String::new(),
            redis: RedisStoreConfig::default(),
        }
    }
}

impl StoreConfig {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        match self.provider.as_str() {
            "redis" | "memory" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: redis, memory"
            ))),
        }
    }
}

/// Redis backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
