//! Subscriber webhooks from the media relay.
//!
//! Both endpoints always answer HTTP 200; the outcome travels in
//! `error_code`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use tracing::{debug, warn};

use crate::dto::request::SubscriberNotification;
use crate::dto::response::WebhookResponse;
use crate::state::AppState;

/// POST /on_sub_start
pub async fn on_sub_start(State(state): State<AppState>, body: Bytes) -> Json<WebhookResponse> {
    let notification: SubscriberNotification = match serde_json::from_slice(&body) {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "Malformed start notification");
            return Json(WebhookResponse::invalid("invalid json"));
        }
    };

    let request = match notification.to_admission() {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Incomplete start notification");
            return Json(WebhookResponse::invalid(e.message));
        }
    };

    let decision = state.quota_service.admit(&request).await;
    Json(WebhookResponse::from(decision))
}

/// POST /on_sub_stop
pub async fn on_sub_stop(State(state): State<AppState>, body: Bytes) -> Json<WebhookResponse> {
    let notification: SubscriberNotification = match serde_json::from_slice(&body) {
        Ok(n) => n,
        Err(e) => {
            debug!(error = %e, "Ignoring malformed stop notification");
            return Json(WebhookResponse::ack());
        }
    };

    match (notification.stream_name(), notification.effective_session_id()) {
        (Some(stream_name), Some(session_id)) => {
            state.quota_service.release(stream_name, session_id).await;
        }
        _ => debug!("Ignoring incomplete stop notification"),
    }

    Json(WebhookResponse::ack())
}
