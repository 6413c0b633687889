//! Cross-process guard against overlapping sweeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use quotagate_cache::keys;
use quotagate_core::result::AppResult;
use quotagate_core::traits::store::StateStore;

/// Exclusive right to run one sweep, held in the shared store.
///
/// The lease is an owner token stored under `enforcer:lease` with a TTL, so
/// a crashed holder frees it automatically. Only the owner can renew or
/// release it.
#[derive(Debug)]
pub struct TickLease {
    store: Arc<dyn StateStore>,
    owner: String,
    ttl: Duration,
    renewed_at: Instant,
}

impl TickLease {
    /// Try to take the lease. Returns `None` if another sweep holds it.
    pub async fn acquire(store: Arc<dyn StateStore>, ttl: Duration) -> AppResult<Option<Self>> {
        let owner = Uuid::new_v4().to_string();
        let acquired = store
            .set_nx(&keys::enforcer_lease(), &owner, Some(ttl))
            .await?;
        if !acquired {
            return Ok(None);
        }

        debug!(owner = %owner, "Acquired enforcer lease");
        Ok(Some(Self {
            store,
            owner,
            ttl,
            renewed_at: Instant::now(),
        }))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Extend the lease once half its TTL has been consumed.
    ///
    /// Returns `false` if the lease was lost; the caller must stop.
    pub async fn renew_if_due(&mut self) -> AppResult<bool> {
        if self.renewed_at.elapsed() < self.ttl / 2 {
            return Ok(true);
        }

        let renewed = self
            .store
            .expire_if_equals(&keys::enforcer_lease(), &self.owner, self.ttl)
            .await?;
        if renewed {
            self.renewed_at = Instant::now();
            debug!(owner = %self.owner, "Renewed enforcer lease");
        }
        Ok(renewed)
    }

    /// Give the lease back. Returns `false` if it had already expired.
    pub async fn release(self) -> AppResult<bool> {
        self.store
            .delete_if_equals(&keys::enforcer_lease(), &self.owner)
            .await
    }
}

/// Index of the sweep window containing `unix_seconds`.
pub fn window_index(unix_seconds: i64, interval: Duration) -> u64 {
    let interval = interval.as_secs().max(1);
    u64::try_from(unix_seconds).unwrap_or_default() / interval
}

/// The next window boundary strictly after `unix_millis`, with the delay
/// until it.
///
/// Boundaries are multiples of `interval` since the Unix epoch, so replicas
/// scheduling from their own clocks agree on which window a deadline bills.
/// `after` is the last window this process swept; the result is always
/// later even if the wall clock reads slightly behind that deadline.
pub fn next_window(unix_millis: i64, interval: Duration, after: Option<u64>) -> (u64, Duration) {
    let period = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1);
    let now = u64::try_from(unix_millis).unwrap_or_default();
    let mut window = now / period + 1;
    if let Some(after) = after {
        window = window.max(after.saturating_add(1));
    }
    let delay = window.saturating_mul(period).saturating_sub(now);
    (window, Duration::from_millis(delay))
}

/// Claim a sweep window fleet-wide. Returns `false` if already claimed.
///
/// The marker outlives its window by one interval, enough for late
/// replicas to see it.
pub async fn claim_window(
    store: &dyn StateStore,
    window: u64,
    interval: Duration,
    owner: &str,
) -> AppResult<bool> {
    store
        .set_nx(&keys::enforcer_window(window), owner, Some(interval * 2))
        .await
}
