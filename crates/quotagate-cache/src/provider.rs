//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use quotagate_core::config::store::StoreConfig;
use quotagate_core::error::AppError;
use quotagate_core::result::AppResult;
use quotagate_core::traits::store::StateStore;

/// Wraps the configured state store provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner provider.
    inner: Arc<dyn StateStore>,
    /// Provider name for diagnostics.
    provider: String,
}

impl StoreManager {
    /// Create a store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn StateStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis state store");
                let client = crate::redis::RedisClient::connect(config).await?;
                Arc::new(crate::redis::RedisStateStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory state store");
                Arc::new(crate::memory::MemoryStateStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: redis, memory"
                )));
            }
        };

        Ok(Self {
            inner,
            provider: config.provider.clone(),
        })
    }

    /// Wrap an existing store (for testing).
    pub fn from_store(store: Arc<dyn StateStore>) -> Self {
        Self {
            inner: store,
            provider: "custom".to_string(),
        }
    }

    /// Shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn StateStore> {
        Arc::clone(&self.inner)
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &str {
        &self.provider
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider() {
        let config = StoreConfig {
            provider: "memory".to_string(),
            ..StoreConfig::default()
        };
        let manager = StoreManager::new(&config).await.unwrap();
        assert_eq!(manager.provider_name(), "memory");
        assert!(manager.store().health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = StoreConfig {
            provider: "etcd".to_string(),
            ..StoreConfig::default()
        };
        let err = StoreManager::new(&config).await.unwrap_err();
        assert!(err.to_string().contains("etcd"));
    }
}
