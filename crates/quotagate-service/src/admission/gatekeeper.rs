//! Admission gatekeeper for session-start notifications.

use tracing::{error, info};

use quotagate_core::error::AppError;
use quotagate_core::result::AppResult;
use quotagate_core::types::{AdmissionDecision, BillingMonth, DenyReason};

use crate::quota::QuotaLedger;
use crate::session::{EvictionDispatcher, SessionRegistry};
use crate::token::extract_token;

/// A validated session-start notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRequest {
    pub session_id: String,
    pub stream_name: String,
    pub connection_url: String,
}

impl AdmissionRequest {
    /// Build a request, rejecting a blank session id or stream name.
    pub fn new(
        session_id: impl Into<String>,
        stream_name: impl Into<String>,
        connection_url: impl Into<String>,
    ) -> AppResult<Self> {
        let session_id = session_id.into();
        let stream_name = stream_name.into();
        if session_id.trim().is_empty() {
            return Err(AppError::validation("session id is required"));
        }
        if stream_name.trim().is_empty() {
            return Err(AppError::validation("stream name is required"));
        }
        Ok(Self {
            session_id,
            stream_name,
            connection_url: connection_url.into(),
        })
    }
}

/// Decides whether a starting session may proceed.
///
/// Denied sessions are answered immediately and kicked after the grace
/// delay. The answer never waits on the relay.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    ledger: QuotaLedger,
    registry: SessionRegistry,
    evictions: EvictionDispatcher,
}

impl Gatekeeper {
    pub fn new(
        ledger: QuotaLedger,
        registry: SessionRegistry,
        evictions: EvictionDispatcher,
    ) -> Self {
        Self {
            ledger,
            registry,
            evictions,
        }
    }

    /// Admit against the current UTC month.
    pub async fn admit(&self, request: &AdmissionRequest) -> AdmissionDecision {
        self.admit_in(request, &BillingMonth::current()).await
    }

    /// Admit against an explicit billing month.
    pub async fn admit_in(
        &self,
        request: &AdmissionRequest,
        month: &BillingMonth,
    ) -> AdmissionDecision {
        let AdmissionRequest {
            session_id,
            stream_name,
            connection_url,
        } = request;

        let Some(token) = extract_token(connection_url) else {
            info!(
                session_id = %session_id,
                stream_name = %stream_name,
                "Rejected session without token"
            );
            return self.deny(request, DenyReason::TokenRequired);
        };

        match self.check_and_register(request, &token, month).await {
            Ok(AdmissionDecision::Deny { reason }) => {
                info!(
                    session_id = %session_id,
                    stream_name = %stream_name,
                    token = %token,
                    "Rejected session out of quota"
                );
                self.deny(request, reason)
            }
            Ok(decision) => decision,
            Err(e) => {
                // Fail closed: an unverifiable session is treated as out of quota.
                error!(
                    session_id = %session_id,
                    stream_name = %stream_name,
                    token = %token,
                    error = %e,
                    "Store failure during admission"
                );
                self.deny(request, DenyReason::OutOfQuota)
            }
        }
    }

    async fn check_and_register(
        &self,
        request: &AdmissionRequest,
        token: &str,
        month: &BillingMonth,
    ) -> AppResult<AdmissionDecision> {
        self.ledger.init_if_absent(token, month).await?;
        let balance = self.ledger.balance(token, month).await?.ok_or_else(|| {
            AppError::store(format!("Ledger entry for '{token}' vanished after init"))
        })?;

        if balance <= 0 {
            return Ok(AdmissionDecision::deny(DenyReason::OutOfQuota));
        }

        self.registry
            .register(&request.stream_name, &request.session_id, token)
            .await?;
        info!(
            session_id = %request.session_id,
            stream_name = %request.stream_name,
            token,
            balance,
            "Admitted session"
        );
        Ok(AdmissionDecision::Allow { balance })
    }

    fn deny(&self, request: &AdmissionRequest, reason: DenyReason) -> AdmissionDecision {
        self.evictions
            .schedule(&request.stream_name, &request.session_id);
        AdmissionDecision::deny(reason)
    }
}
