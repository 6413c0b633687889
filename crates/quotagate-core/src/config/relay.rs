//! Media relay control API configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound for the post-denial grace delay.
const MAX_GRACE_DELAY_MS: u64 = 5_000;

/// Settings for the relay's `kick_session` control endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// `host:port` (or full `http(s)://` base URL) of the control API.
    #[serde(default = "default_control_api_addr")]
    pub control_api_addr: String,
    /// Request timeout for a kick call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Delay before the out-of-band kick that follows a denied admission.
    #[serde(default = "default_grace_delay")]
    pub kick_grace_delay_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            control_api_addr: default_control_api_addr(),
            timeout_seconds: default_timeout(),
            kick_grace_delay_ms: default_grace_delay(),
        }
    }
}

impl RelayConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Grace delay before a delayed kick.
    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.kick_grace_delay_ms)
    }

    /// Full URL of the `kick_session` endpoint.
    pub fn kick_session_url(&self) -> String {
        let base = self.control_api_addr.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            format!("{base}/api/ctrl/kick_session")
        } else {
            format!("http://{base}/api/ctrl/kick_session")
        }
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.control_api_addr.trim().is_empty() {
            return Err(AppError::configuration(
                "relay.control_api_addr must not be empty",
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(AppError::configuration(
                "relay.timeout_seconds must be positive",
            ));
        }
        if self.kick_grace_delay_ms > MAX_GRACE_DELAY_MS {
            return Err(AppError::configuration(format!(
                "relay.kick_grace_delay_ms must be at most {MAX_GRACE_DELAY_MS}"
            )));
        }
        Ok(())
    }
}

fn default_control_api_addr() -> String {
    "127.0.0.1:8083".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_grace_delay() -> u64 {
    300
}
