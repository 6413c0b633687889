//! Active session listing.

use axum::Json;
use axum::extract::State;

use quotagate_service::SessionSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state.quota_service.session_snapshot().await?;
    Ok(Json(snapshot))
}
