//! Session eviction trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Forces a live session off the media relay.
///
/// Calls are best-effort: callers log and ignore errors. Implementations
/// must tolerate being asked to evict a session that is already gone.
#[async_trait]
pub trait SessionEvictor: Send + Sync + std::fmt::Debug + 'static {
    /// Ask the relay to terminate `session_id` on `stream_name`.
    async fn request_eviction(&self, stream_name: &str, session_id: &str) -> AppResult<()>;
}
