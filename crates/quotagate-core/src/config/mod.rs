//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay, `QUOTAGATE__*` environment
//! variables, and finally the flat legacy variables listed in
//! [`legacy`]. Each sub-module represents a logical configuration section.

pub mod app;
pub mod enforcer;
pub mod legacy;
pub mod logging;
pub mod quota;
pub mod relay;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::enforcer::EnforcerConfig;
pub use self::logging::LoggingConfig;
pub use self::quota::QuotaConfig;
pub use self::relay::RelayConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared state store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Quota policy settings.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Enforcement sweep settings.
    #[serde(default)]
    pub enforcer: EnforcerConfig,
    /// Media relay control API settings.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Reads `config/default` then `config/{env}`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration from an explicit base file plus the environment
    /// overlay, `QUOTAGATE__*` variables and legacy variables.
    pub fn load_from(base_path: &str, env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(base_path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("QUOTAGATE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = legacy::apply_overrides(builder)?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the enforcement loop cannot run safely with.
    pub fn validate(&self) -> Result<(), AppError> {
        self.store.validate()?;
        self.quota.validate()?;
        self.enforcer.validate()?;
        self.relay.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quota.default_seconds, 120);
        assert_eq!(config.enforcer.interval_seconds, 5);
        assert_eq!(config.enforcer.cost_per_tick, 5);
        assert_eq!(config.relay.control_api_addr, "127.0.0.1:8083");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let raw = r#"
            [quota]
            default_seconds = 600

            [store]
            provider = "memory"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.quota.default_seconds, 600);
        assert_eq!(config.quota.mapping_ttl_seconds, 7200);
        assert_eq!(config.store.provider, "memory");
        assert_eq!(config.enforcer.lease_ttl_seconds, 30);
    }

    #[test]
    fn test_validate_rejects_short_lease() {
        let mut config = AppConfig::default();
        config.enforcer.lease_ttl_seconds = config.enforcer.interval_seconds;
        assert!(config.validate().is_err());
    }
}
