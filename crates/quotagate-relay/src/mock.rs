//! Recording evictor for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::Instant;

use quotagate_core::error::AppError;
use quotagate_core::result::AppResult;
use quotagate_core::traits::evictor::SessionEvictor;

/// One observed eviction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionCall {
    pub stream_name: String,
    pub session_id: String,
    /// Tokio clock reading when the call arrived.
    pub at: Instant,
}

/// Evictor that records every call instead of talking to a relay.
#[derive(Debug, Clone, Default)]
pub struct RecordingEvictor {
    calls: Arc<Mutex<Vec<EvictionCall>>>,
    failing: bool,
}

impl RecordingEvictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An evictor that records calls and then reports a relay failure.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<EvictionCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All calls so far, in arrival order.
    pub fn calls(&self) -> Vec<EvictionCall> {
        self.guard().clone()
    }

    /// `(stream, session)` pairs so far, in arrival order.
    pub fn targets(&self) -> Vec<(String, String)> {
        self.guard()
            .iter()
            .map(|call| (call.stream_name.clone(), call.session_id.clone()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.guard().len()
    }
}

#[async_trait]
impl SessionEvictor for RecordingEvictor {
    async fn request_eviction(&self, stream_name: &str, session_id: &str) -> AppResult<()> {
        self.guard().push(EvictionCall {
            stream_name: stream_name.to_string(),
            session_id: session_id.to_string(),
            at: Instant::now(),
        });
        if self.failing {
            return Err(AppError::external_service("relay unavailable"));
        }
        Ok(())
    }
}
