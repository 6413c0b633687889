//! Response DTOs.

use serde::Serialize;

use quotagate_core::types::AdmissionDecision;
use quotagate_core::types::admission::{CODE_INVALID_INPUT, CODE_OK};

/// Webhook answer understood by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub error_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desp: Option<String>,
}

impl WebhookResponse {
    /// Bare acknowledgement, as sent for stop notifications.
    pub fn ack() -> Self {
        Self {
            error_code: CODE_OK,
            desp: None,
        }
    }

    pub fn invalid(desp: impl Into<String>) -> Self {
        Self {
            error_code: CODE_INVALID_INPUT,
            desp: Some(desp.into()),
        }
    }
}

impl From<AdmissionDecision> for WebhookResponse {
    fn from(decision: AdmissionDecision) -> Self {
        Self {
            error_code: decision.code(),
            desp: Some(decision.description().to_string()),
        }
    }
}

/// Health probe body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    pub version: String,
    /// Configured store provider.
    pub store_provider: String,
    /// `"connected"` or `"unavailable"`.
    pub store: String,
    pub enforcer_enabled: bool,
    pub uptime_seconds: u64,
}
