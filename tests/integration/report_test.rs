//! Integration tests for the read-only report endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

use quotagate_core::config::AppConfig;
use quotagate_core::types::BillingMonth;

#[tokio::test]
async fn test_quotas_lists_every_checked_token() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();

    app.start("s1", "stream", "rtmp://relay/live/stream?token=abc")
        .await;
    app.start("s2", "stream", "rtmp://relay/live/stream?token=xyz")
        .await;
    app.service
        .ledger()
        .decrement_by("xyz", &month, 120)
        .await
        .unwrap();
    // Denied checks still create the entry.
    app.start("s3", "other", "rtmp://relay/live/other?token=xyz")
        .await;

    let resp = app.request("GET", "/quotas", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({
            "month": month.to_string(),
            "quotas": {
                "abc": {"remaining_seconds": 120, "status": "active"},
                "xyz": {"remaining_seconds": 0, "status": "exhausted"}
            }
        })
    );
}

#[tokio::test]
async fn test_quotas_empty_month() {
    let app = helpers::TestApp::new();
    let resp = app.request("GET", "/quotas", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["quotas"], json!({}));
}

#[tokio::test]
async fn test_quotas_for_explicit_month() {
    let app = helpers::TestApp::new();
    let past = BillingMonth::new(2024, 2).unwrap();
    app.service
        .ledger()
        .init_if_absent("old-token", &past)
        .await
        .unwrap();
    app.start("s1", "stream", "rtmp://relay/live/stream?token=abc")
        .await;

    let resp = app.request("GET", "/quotas?month=2024-02", None).await;
    assert_eq!(
        resp.body,
        json!({
            "month": "2024-02",
            "quotas": {"old-token": {"remaining_seconds": 120, "status": "active"}}
        })
    );
}

#[tokio::test]
async fn test_quotas_rejects_bad_month() {
    let app = helpers::TestApp::new();
    let resp = app.request("GET", "/quotas?month=february", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_custom_default_quota() {
    let mut config = AppConfig::default();
    config.quota.default_seconds = 600;
    let app = helpers::TestApp::with_config(config);

    app.start("s1", "stream", "rtmp://relay/live/stream?token=abc")
        .await;
    let resp = app.request("GET", "/quotas", None).await;
    assert_eq!(resp.body["quotas"]["abc"]["remaining_seconds"], 600);
}

#[tokio::test]
async fn test_health_reports_store() {
    let app = helpers::TestApp::new();
    let resp = app.request("GET", "/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "ok");
    assert_eq!(resp.body["store"], "connected");
    assert_eq!(resp.body["store_provider"], "memory");
}
