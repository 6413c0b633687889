//! Request DTOs.

use serde::Deserialize;

use quotagate_core::result::AppResult;
use quotagate_service::AdmissionRequest;

/// Body of the relay's `on_sub_start` and `on_sub_stop` webhooks.
///
/// Relay versions differ in whether the session id arrives as
/// `session_id` or `id`; a non-empty `session_id` wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriberNotification {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub stream_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SubscriberNotification {
    /// Session id from `session_id`, falling back to `id`.
    pub fn effective_session_id(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.is_empty()))
    }

    pub fn stream_name(&self) -> Option<&str> {
        self.stream_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Validate into an admission request.
    pub fn to_admission(&self) -> AppResult<AdmissionRequest> {
        AdmissionRequest::new(
            self.effective_session_id().unwrap_or_default(),
            self.stream_name().unwrap_or_default(),
            self.url.clone().unwrap_or_default(),
        )
    }
}

/// Query string of `GET /quotas`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaQuery {
    /// Billing month as `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}
