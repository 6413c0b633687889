//! Quota report handler.

use axum::Json;
use axum::extract::{Query, State};

use quotagate_core::types::BillingMonth;
use quotagate_service::QuotaReport;

use crate::dto::request::QuotaQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /quotas
pub async fn list_quotas(
    State(state): State<AppState>,
    Query(query): Query<QuotaQuery>,
) -> Result<Json<QuotaReport>, ApiError> {
    let month = match query.month.as_deref() {
        Some(raw) => raw.parse::<BillingMonth>()?,
        None => BillingMonth::current(),
    };

    let report = state.quota_service.quota_report(month).await?;
    Ok(Json(report))
}
