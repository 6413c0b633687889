//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use quotagate_api::AppState;
use quotagate_api::router::build_router;
use quotagate_cache::memory::MemoryStateStore;
use quotagate_core::config::AppConfig;
use quotagate_core::traits::store::StateStore;
use quotagate_relay::mock::RecordingEvictor;
use quotagate_service::QuotaService;
use quotagate_worker::Enforcer;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The service behind the router
    pub service: QuotaService,
    /// Store shared by router and enforcer
    pub store: Arc<dyn StateStore>,
    /// Records every kick instead of calling a relay
    pub evictor: RecordingEvictor,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application with default quota settings
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application on the in-memory store
    pub fn with_config(mut config: AppConfig) -> Self {
        config.store.provider = "memory".to_string();

        let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::new());
        let evictor = RecordingEvictor::new();
        let service = QuotaService::new(store.clone(), Arc::new(evictor.clone()), &config);
        let router = build_router(AppState::new(config.clone(), service.clone()));

        Self {
            router,
            service,
            store,
            evictor,
            config,
        }
    }

    /// Enforcer sharing this app's store and evictor
    pub fn enforcer(&self) -> Enforcer {
        Enforcer::new(self.service.clone(), self.config.enforcer.clone())
    }

    /// Make an HTTP request with an optional JSON body
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.request_raw(method, path, &body_str).await
    }

    /// Make an HTTP request with a raw body
    pub async fn request_raw(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Send a subscriber-start notification
    pub async fn start(&self, session_id: &str, stream_name: &str, url: &str) -> TestResponse {
        self.request(
            "POST",
            "/on_sub_start",
            Some(json!({
                "session_id": session_id,
                "stream_name": stream_name,
                "url": url,
            })),
        )
        .await
    }

    /// Send a subscriber-stop notification
    pub async fn stop(&self, session_id: &str, stream_name: &str) -> TestResponse {
        self.request(
            "POST",
            "/on_sub_stop",
            Some(json!({
                "session_id": session_id,
                "stream_name": stream_name,
                "url": "",
            })),
        )
        .await
    }
}

/// Test response wrapper
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The webhook `error_code` field
    pub fn error_code(&self) -> i64 {
        self.body["error_code"].as_i64().expect("missing error_code")
    }
}
