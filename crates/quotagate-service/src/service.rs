//! Façade over the admission, cleanup, and reporting services.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use quotagate_core::config::AppConfig;
use quotagate_core::result::AppResult;
use quotagate_core::traits::evictor::SessionEvictor;
use quotagate_core::traits::store::StateStore;
use quotagate_core::types::{AdmissionDecision, BillingMonth};

use crate::admission::{AdmissionRequest, Gatekeeper};
use crate::quota::{QuotaLedger, QuotaReport};
use crate::session::{ActiveSession, EvictionDispatcher, SessionRegistry, SessionSnapshot};

/// The quota state machine, built once at startup and shared by the HTTP
/// handlers, the enforcer, and the CLI.
#[derive(Debug, Clone)]
pub struct QuotaService {
    store: Arc<dyn StateStore>,
    ledger: QuotaLedger,
    registry: SessionRegistry,
    evictions: EvictionDispatcher,
    gatekeeper: Gatekeeper,
}

impl QuotaService {
    pub fn new(
        store: Arc<dyn StateStore>,
        evictor: Arc<dyn SessionEvictor>,
        config: &AppConfig,
    ) -> Self {
        let ledger = QuotaLedger::new(store.clone(), config.quota.default_seconds);
        let registry = SessionRegistry::new(store.clone(), config.quota.mapping_ttl());
        let evictions = EvictionDispatcher::new(evictor, config.relay.grace_delay());
        let gatekeeper = Gatekeeper::new(ledger.clone(), registry.clone(), evictions.clone());

        Self {
            store,
            ledger,
            registry,
            evictions,
            gatekeeper,
        }
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    pub fn ledger(&self) -> &QuotaLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn evictions(&self) -> &EvictionDispatcher {
        &self.evictions
    }

    /// Handle a session-start notification.
    pub async fn admit(&self, request: &AdmissionRequest) -> AdmissionDecision {
        self.gatekeeper.admit(request).await
    }

    /// Handle a session-stop notification.
    ///
    /// Removes the session and its mapping. Already-consumed quota is not
    /// refunded. Store failures are logged and swallowed.
    pub async fn release(&self, stream_name: &str, session_id: &str) {
        match self.registry.unregister(stream_name, session_id).await {
            Ok(()) => debug!(stream_name, session_id, "Released session"),
            Err(e) => warn!(
                stream_name,
                session_id,
                error = %e,
                "Failed to release session"
            ),
        }
    }

    /// Ledger report for a billing month.
    pub async fn quota_report(&self, month: BillingMonth) -> AppResult<QuotaReport> {
        let entries = self.ledger.snapshot(&month).await?;
        Ok(QuotaReport::from_entries(month, entries))
    }

    /// All active sessions grouped by stream.
    pub async fn session_snapshot(&self) -> AppResult<SessionSnapshot> {
        let mut streams = BTreeMap::new();
        for stream_name in self.registry.active_streams().await? {
            let mut sessions = Vec::new();
            for session_id in self.registry.active_sessions(&stream_name).await? {
                let token = self.registry.token_for(&session_id).await?;
                sessions.push(ActiveSession { session_id, token });
            }
            if !sessions.is_empty() {
                streams.insert(stream_name, sessions);
            }
        }
        Ok(SessionSnapshot { streams })
    }

    /// Kick a session immediately and drop it from the registry.
    ///
    /// Returns whether the relay accepted the request.
    pub async fn kick(&self, stream_name: &str, session_id: &str) -> AppResult<bool> {
        let delivered = self.evictions.evict_now(stream_name, session_id).await;
        self.registry.unregister(stream_name, session_id).await?;
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use quotagate_cache::memory::MemoryStateStore;
    use quotagate_relay::mock::RecordingEvictor;

    use super::*;

    fn service() -> (QuotaService, RecordingEvictor) {
        let evictor = RecordingEvictor::new();
        let service = QuotaService::new(
            Arc::new(MemoryStateStore::new()),
            Arc::new(evictor.clone()),
            &AppConfig::default(),
        );
        (service, evictor)
    }

    fn start(session_id: &str, stream_name: &str, token: &str) -> AdmissionRequest {
        AdmissionRequest::new(
            session_id,
            stream_name,
            format!("rtmp://relay/live/{stream_name}?token={token}"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (service, _) = service();
        service.admit(&start("s1", "live", "abc")).await;

        service.release("live", "s1").await;
        service.release("live", "s1").await;
        service.release("live", "never-registered").await;

        assert_eq!(service.session_snapshot().await.unwrap().session_count(), 0);
        assert_eq!(service.registry().token_for("s1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_release_does_not_refund() {
        let (service, _) = service();
        let month = BillingMonth::current();
        service.admit(&start("s1", "live", "abc")).await;
        service.ledger().decrement_by("abc", &month, 10).await.unwrap();

        service.release("live", "s1").await;
        assert_eq!(
            service.ledger().balance("abc", &month).await.unwrap(),
            Some(110)
        );
    }

    #[tokio::test]
    async fn test_session_snapshot_groups_by_stream() {
        let (service, _) = service();
        service.admit(&start("s1", "cam-a", "abc")).await;
        service.admit(&start("s2", "cam-a", "xyz")).await;
        service.admit(&start("s3", "cam-b", "abc")).await;

        let snapshot = service.session_snapshot().await.unwrap();
        assert_eq!(snapshot.session_count(), 3);
        assert_eq!(
            snapshot.streams["cam-a"],
            vec![
                ActiveSession {
                    session_id: "s1".to_string(),
                    token: Some("abc".to_string())
                },
                ActiveSession {
                    session_id: "s2".to_string(),
                    token: Some("xyz".to_string())
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_quota_report_for_current_month() {
        let (service, _) = service();
        service.admit(&start("s1", "live", "abc")).await;

        let report = service.quota_report(BillingMonth::current()).await.unwrap();
        assert_eq!(report.quotas["abc"].remaining_seconds, 120);
    }

    #[tokio::test]
    async fn test_kick_evicts_and_unregisters() {
        let (service, evictor) = service();
        service.admit(&start("s1", "live", "abc")).await;

        assert!(service.kick("live", "s1").await.unwrap());
        assert_eq!(
            evictor.targets(),
            vec![("live".to_string(), "s1".to_string())]
        );
        assert_eq!(service.session_snapshot().await.unwrap().session_count(), 0);
    }
}
