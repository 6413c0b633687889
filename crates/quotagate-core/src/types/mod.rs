//! Shared domain types.

pub mod admission;
pub mod month;

pub use admission::{AdmissionDecision, DenyReason};
pub use month::BillingMonth;
