//! # quotagate-cache
//!
//! Shared state store implementations for QuotaGate. Supports two modes:
//!
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate,
//!   required when more than one QuotaGate process shares the ledger
//! - **memory**: In-process store built on [dashmap](https://crates.io/crates/dashmap)
//!   for single-node deployments and tests
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
