//! # quotagate-core
//!
//! Core crate for QuotaGate. Contains the store and evictor traits,
//! configuration schemas, billing/admission types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other QuotaGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
