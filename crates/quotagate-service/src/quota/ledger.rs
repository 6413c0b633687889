//! Remaining-seconds counters keyed by token and billing month.

use std::sync::Arc;

use tracing::{debug, warn};

use quotagate_cache::keys;
use quotagate_core::error::AppError;
use quotagate_core::result::AppResult;
use quotagate_core::traits::store::StateStore;
use quotagate_core::types::BillingMonth;

/// One ledger counter as read by [`QuotaLedger::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub token: String,
    pub remaining_seconds: i64,
}

/// Atomic per-token-per-month counter of remaining seconds.
///
/// Entries are created with the default quota on first admission check and
/// are only ever decremented afterwards. Values may go negative. An entry is
/// never deleted; it goes dormant when the month rolls over.
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    store: Arc<dyn StateStore>,
    default_seconds: i64,
}

impl QuotaLedger {
    pub fn new(store: Arc<dyn StateStore>, default_seconds: i64) -> Self {
        Self {
            store,
            default_seconds,
        }
    }

    /// Seconds granted to a fresh entry.
    pub fn default_seconds(&self) -> i64 {
        self.default_seconds
    }

    /// Create the entry with the default quota unless it already exists.
    ///
    /// Returns `true` if this call created it.
    pub async fn init_if_absent(&self, token: &str, month: &BillingMonth) -> AppResult<bool> {
        let key = keys::quota_remaining(token, month);
        let created = self
            .store
            .set_nx(&key, &self.default_seconds.to_string(), None)
            .await?;
        if created {
            debug!(token, %month, seconds = self.default_seconds, "Initialized quota");
        }
        Ok(created)
    }

    /// Current balance, or `None` if the entry does not exist.
    pub async fn balance(&self, token: &str, month: &BillingMonth) -> AppResult<Option<i64>> {
        let key = keys::quota_remaining(token, month);
        match self.store.get(&key).await? {
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                AppError::store(format!(
                    "Ledger entry '{key}' holds a non-integer value"
                ))
            }),
            None => Ok(None),
        }
    }

    /// Atomically subtract `seconds` and return the new balance.
    ///
    /// Returns `None` without creating anything if the entry does not exist.
    pub async fn decrement_by(
        &self,
        token: &str,
        month: &BillingMonth,
        seconds: i64,
    ) -> AppResult<Option<i64>> {
        let key = keys::quota_remaining(token, month);
        self.store.decr_by_existing(&key, seconds).await
    }

    /// All entries of a month, sorted by token.
    pub async fn snapshot(&self, month: &BillingMonth) -> AppResult<Vec<LedgerEntry>> {
        let pattern = keys::quota_month_pattern(month);
        let mut entries = Vec::new();

        for key in self.store.scan_keys(&pattern).await? {
            let Some(token) = keys::token_from_quota_key(&key, month) else {
                continue;
            };
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };
            match raw.parse::<i64>() {
                Ok(remaining_seconds) => entries.push(LedgerEntry {
                    token: token.to_string(),
                    remaining_seconds,
                }),
                Err(_) => warn!(key = %key, value = %raw, "Skipping non-integer ledger entry"),
            }
        }

        entries.sort_by(|a, b| a.token.cmp(&b.token));
        Ok(entries)
    }
}
