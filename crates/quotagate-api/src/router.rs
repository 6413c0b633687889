//! Route definitions for the QuotaGate HTTP API.
//!
//! Webhook paths are fixed by the relay's configuration and mounted at the
//! root, next to the read-only report endpoints.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(webhook_routes())
        .merge(report_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Subscriber start/stop notifications from the relay
fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/on_sub_start", post(handlers::webhook::on_sub_start))
        .route("/on_sub_stop", post(handlers::webhook::on_sub_stop))
}

/// Read-only ledger and session views
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/quotas", get(handlers::quota::list_quotas))
        .route("/sessions", get(handlers::session::list_sessions))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
