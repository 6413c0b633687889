//! Convenience result type alias for QuotaGate.

use crate::error::AppError;

/// A specialized `Result` type for QuotaGate operations.
pub type AppResult<T> = Result<T, AppError>;
