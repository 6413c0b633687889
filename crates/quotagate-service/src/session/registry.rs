//! Per-stream active-session sets and the session-to-token mapping.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use quotagate_cache::keys;
use quotagate_core::result::AppResult;
use quotagate_core::traits::store::StateStore;

/// Tracks which sessions are billable and which token each one bills.
///
/// The mapping carries a safety-net expiry so sessions whose stop
/// notification was lost eventually stop being billed. A session listed in
/// an active set without a mapping is not yet (or no longer) billable.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    store: Arc<dyn StateStore>,
    mapping_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn StateStore>, mapping_ttl: Duration) -> Self {
        Self { store, mapping_ttl }
    }

    /// Record an admitted session.
    ///
    /// The mapping is written before set membership so a sweep never finds
    /// a freshly admitted session without its token.
    pub async fn register(&self, stream_name: &str, session_id: &str, token: &str) -> AppResult<()> {
        self.store
            .set_ex(&keys::session_token(session_id), token, self.mapping_ttl)
            .await?;
        self.store
            .set_add(&keys::active_sessions(stream_name), session_id)
            .await?;
        debug!(stream_name, session_id, token, "Registered session");
        Ok(())
    }

    /// Token billed by a session, if its mapping is still present.
    pub async fn token_for(&self, session_id: &str) -> AppResult<Option<String>> {
        self.store.get(&keys::session_token(session_id)).await
    }

    /// Remove a session from its stream and delete its mapping.
    ///
    /// Idempotent: unknown sessions are a no-op.
    pub async fn unregister(&self, stream_name: &str, session_id: &str) -> AppResult<()> {
        self.store
            .set_remove(&keys::active_sessions(stream_name), session_id)
            .await?;
        self.store.delete(&keys::session_token(session_id)).await?;
        Ok(())
    }

    /// Drop a session id that has no mapping from its stream's set.
    ///
    /// The mapping is checked again after the removal. If the session was
    /// admitted in between, its membership is restored and `false` is
    /// returned.
    pub async fn prune_orphan(&self, stream_name: &str, session_id: &str) -> AppResult<bool> {
        let set_key = keys::active_sessions(stream_name);
        self.store.set_remove(&set_key, session_id).await?;

        if self.token_for(session_id).await?.is_some() {
            self.store.set_add(&set_key, session_id).await?;
            debug!(stream_name, session_id, "Session re-admitted during prune, kept");
            return Ok(false);
        }
        Ok(true)
    }

    /// Streams that currently have at least one active session, sorted.
    pub async fn active_streams(&self) -> AppResult<Vec<String>> {
        let mut streams: Vec<String> = self
            .store
            .scan_keys(&keys::active_sessions_pattern())
            .await?
            .iter()
            .filter_map(|key| keys::stream_from_active_sessions_key(key))
            .map(str::to_string)
            .collect();
        streams.sort();
        streams.dedup();
        Ok(streams)
    }

    /// Session ids active on a stream, sorted.
    pub async fn active_sessions(&self, stream_name: &str) -> AppResult<Vec<String>> {
        let mut sessions = self
            .store
            .set_members(&keys::active_sessions(stream_name))
            .await?;
        sessions.sort();
        Ok(sessions)
    }
}
