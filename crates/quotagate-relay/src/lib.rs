//! # quotagate-relay
//!
//! Client for the media relay's HTTP control API. Only the
//! `kick_session` endpoint is used: it forcibly terminates a subscriber
//! session and backs the [`SessionEvictor`](quotagate_core::traits::SessionEvictor)
//! trait.

pub mod client;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{KickSessionRequest, RelayControlClient};
