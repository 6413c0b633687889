//! Read-only view of the current month's ledger.

use std::collections::BTreeMap;

use serde::Serialize;

use quotagate_core::types::BillingMonth;

use super::ledger::LedgerEntry;

/// Whether a token can still be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaStatus {
    Active,
    Exhausted,
}

impl QuotaStatus {
    pub fn from_remaining(remaining_seconds: i64) -> Self {
        if remaining_seconds > 0 {
            Self::Active
        } else {
            Self::Exhausted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Report row for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenQuota {
    pub remaining_seconds: i64,
    pub status: QuotaStatus,
}

/// Token to quota mapping for one billing month.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaReport {
    pub month: BillingMonth,
    pub quotas: BTreeMap<String, TokenQuota>,
}

impl QuotaReport {
    pub fn from_entries(month: BillingMonth, entries: Vec<LedgerEntry>) -> Self {
        let quotas = entries
            .into_iter()
            .map(|entry| {
                let row = TokenQuota {
                    remaining_seconds: entry.remaining_seconds,
                    status: QuotaStatus::from_remaining(entry.remaining_seconds),
                };
                (entry.token, row)
            })
            .collect();
        Self { month, quotas }
    }
}
