//! HTTP client for the relay's `kick_session` control endpoint.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use quotagate_core::config::RelayConfig;
use quotagate_core::error::{AppError, ErrorKind};
use quotagate_core::result::AppResult;
use quotagate_core::traits::evictor::SessionEvictor;

/// JSON body of a kick request.
#[derive(Debug, Clone, Serialize)]
pub struct KickSessionRequest<'a> {
    pub stream_name: &'a str,
    pub session_id: &'a str,
}

/// Fire-and-forget caller of `POST /api/ctrl/kick_session`.
///
/// A single attempt per call with a bounded timeout. The relay's answer is
/// logged but never interpreted: kicking a session that already ended is
/// harmless.
#[derive(Debug, Clone)]
pub struct RelayControlClient {
    http: reqwest::Client,
    kick_url: String,
}

impl RelayControlClient {
    /// Build a client from the relay configuration.
    pub fn new(config: &RelayConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build relay HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            kick_url: config.kick_session_url(),
        })
    }

    /// Endpoint this client posts to.
    pub fn kick_url(&self) -> &str {
        &self.kick_url
    }
}

#[async_trait]
impl SessionEvictor for RelayControlClient {
    async fn request_eviction(&self, stream_name: &str, session_id: &str) -> AppResult<()> {
        let body = KickSessionRequest {
            stream_name,
            session_id,
        };

        let response = self
            .http
            .post(&self.kick_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    stream_name,
                    session_id,
                    error = %e,
                    "Kick request failed"
                );
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("kick_session request failed for '{session_id}'"),
                    e,
                )
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        info!(
            stream_name,
            session_id,
            status = status.as_u16(),
            response = %text,
            "Kick request sent"
        );
        Ok(())
    }
}
