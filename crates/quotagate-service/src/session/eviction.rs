//! Dispatches kick requests to the relay.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use quotagate_core::traits::evictor::SessionEvictor;

/// Wraps the [`SessionEvictor`] with the two calling conventions the
/// service needs: an awaited kick for the sweep and a delayed,
/// detached kick for denied admissions.
///
/// The relay only accepts a kick once the subscriber is fully attached,
/// which happens after the start webhook has been answered. A denied
/// session is therefore kicked after a short grace delay.
#[derive(Debug, Clone)]
pub struct EvictionDispatcher {
    evictor: Arc<dyn SessionEvictor>,
    grace_delay: Duration,
}

impl EvictionDispatcher {
    pub fn new(evictor: Arc<dyn SessionEvictor>, grace_delay: Duration) -> Self {
        Self {
            evictor,
            grace_delay,
        }
    }

    pub fn grace_delay(&self) -> Duration {
        self.grace_delay
    }

    /// Kick a session and wait for the relay's answer.
    ///
    /// Failures are logged; returns whether the request went through.
    pub async fn evict_now(&self, stream_name: &str, session_id: &str) -> bool {
        match self.evictor.request_eviction(stream_name, session_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(stream_name, session_id, error = %e, "Eviction request failed");
                false
            }
        }
    }

    /// Kick a session after the grace delay on a detached task.
    ///
    /// The returned handle may be dropped; the kick still happens. A kick
    /// scheduled this way cannot be cancelled, and lands on whatever session
    /// holds the id by then.
    pub fn schedule(&self, stream_name: &str, session_id: &str) -> JoinHandle<()> {
        let dispatcher = self.clone();
        let stream_name = stream_name.to_string();
        let session_id = session_id.to_string();

        debug!(
            stream_name = %stream_name,
            session_id = %session_id,
            delay_ms = self.grace_delay.as_millis() as u64,
            "Scheduling delayed eviction"
        );

        tokio::spawn(async move {
            tokio::time::sleep(dispatcher.grace_delay).await;
            dispatcher.evict_now(&stream_name, &session_id).await;
        })
    }
}
