//! Periodic enforcement for QuotaGate.
//!
//! This crate provides:
//! - The [`Enforcer`], one sweep that bills every active session and kicks
//!   those whose quota ran out
//! - A tick lease and per-window claim so replicas sharing a store never
//!   bill the same window twice
//! - The [`EnforcerRunner`] loop driving the sweep on a fixed interval

pub mod enforcer;
pub mod lease;
pub mod runner;

pub use enforcer::{CycleOutcome, CycleReport, Enforcer, SkipReason};
pub use runner::EnforcerRunner;
