//! Session-start admission.

pub mod gatekeeper;

pub use gatekeeper::{AdmissionRequest, Gatekeeper};
