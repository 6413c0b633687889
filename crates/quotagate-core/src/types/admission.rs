//! Admission decision types and their webhook codes.

use serde::{Deserialize, Serialize};

/// Webhook code for an allowed session (and for every stop notification).
pub const CODE_OK: i32 = 0;
/// Webhook code for a malformed notification body.
pub const CODE_INVALID_INPUT: i32 = 1;
/// Webhook code for a start notification without a `token` parameter.
pub const CODE_TOKEN_REQUIRED: i32 = 1001;
/// Webhook code for a token whose monthly balance is exhausted.
pub const CODE_OUT_OF_QUOTA: i32 = 1002;

/// Why a start notification was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The connection URL carried no `token` query parameter.
    TokenRequired,
    /// The token's balance for the current month is zero or below.
    ///
    /// Also used when the ledger could not be consulted.
    OutOfQuota,
}

impl DenyReason {
    /// Webhook `error_code` for this reason.
    pub fn code(&self) -> i32 {
        match self {
            Self::TokenRequired => CODE_TOKEN_REQUIRED,
            Self::OutOfQuota => CODE_OUT_OF_QUOTA,
        }
    }

    /// Webhook `desp` text for this reason.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TokenRequired => "token required",
            Self::OutOfQuota => "out of quota",
        }
    }
}

/// Synchronous answer to a session-start notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AdmissionDecision {
    /// The session may proceed; `balance` is the remaining quota seen at
    /// admission time.
    Allow {
        /// Remaining seconds at the moment of the check.
        balance: i64,
    },
    /// The session must not proceed.
    Deny {
        /// Why it was rejected.
        reason: DenyReason,
    },
}

impl AdmissionDecision {
    /// Shorthand for a denial.
    pub fn deny(reason: DenyReason) -> Self {
        Self::Deny { reason }
    }

    /// Whether the session was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Webhook `error_code`.
    pub fn code(&self) -> i32 {
        match self {
            Self::Allow { .. } => CODE_OK,
            Self::Deny { reason } => reason.code(),
        }
    }

    /// Webhook `desp` text.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "ok",
            Self::Deny { reason } => reason.description(),
        }
    }
}
