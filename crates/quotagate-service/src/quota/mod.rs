//! Per-token monthly quota ledger and its read-only report.

pub mod ledger;
pub mod report;

pub use ledger::{LedgerEntry, QuotaLedger};
pub use report::{QuotaReport, QuotaStatus, TokenQuota};
