//! # quotagate-service
//!
//! The admission and metering state machine. Services here own no
//! connections of their own: the shared store and the relay evictor are
//! injected as trait objects so tests run against the in-memory store and a
//! recording evictor.

pub mod admission;
pub mod quota;
pub mod service;
pub mod session;
pub mod token;

pub use admission::{AdmissionRequest, Gatekeeper};
pub use quota::{LedgerEntry, QuotaLedger, QuotaReport, QuotaStatus};
pub use service::QuotaService;
pub use session::{EvictionDispatcher, SessionRegistry, SessionSnapshot};
