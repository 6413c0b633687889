//! # quotagate-api
//!
//! HTTP layer for QuotaGate built on Axum.
//!
//! Serves the relay's subscriber webhooks (`/on_sub_start`,
//! `/on_sub_stop`), the read-only quota and session reports, and a health
//! probe. Also wires the store, relay client, service, and enforcer
//! together into a running server.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, shutdown_signal};
pub use state::AppState;
