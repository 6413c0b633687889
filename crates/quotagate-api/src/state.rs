//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use quotagate_core::config::AppConfig;
use quotagate_service::QuotaService;

/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Admission, cleanup, and reporting
    pub quota_service: Arc<QuotaService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, quota_service: QuotaService) -> Self {
        Self {
            config: Arc::new(config),
            quota_service: Arc::new(quota_service),
            started_at: Instant::now(),
        }
    }
}
