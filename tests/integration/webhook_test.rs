//! Integration tests for the subscriber webhooks.

mod helpers;

use std::time::Duration;

use http::StatusCode;
use serde_json::json;

use quotagate_core::types::BillingMonth;

const URL_ABC: &str = "rtmp://127.0.0.1:1935/live/stream?token=abc";

#[tokio::test]
async fn test_admission_initializes_ledger() {
    let app = helpers::TestApp::new();

    let resp = app.start("s1", "stream", URL_ABC).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"error_code": 0, "desp": "ok"}));

    let month = BillingMonth::current();
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(120)
    );
    assert_eq!(
        app.service.registry().active_sessions("stream").await.unwrap(),
        vec!["s1"]
    );
}

#[tokio::test]
async fn test_repeat_admission_does_not_reset_balance() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();

    app.start("s1", "stream", URL_ABC).await;
    app.service
        .ledger()
        .decrement_by("abc", &month, 30)
        .await
        .unwrap();

    let resp = app.start("s2", "stream", URL_ABC).await;
    assert_eq!(resp.error_code(), 0);
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(90)
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_token_kicked_after_grace_delay() {
    let app = helpers::TestApp::new();
    let started = tokio::time::Instant::now();

    let resp = app
        .start("s1", "stream", "rtmp://127.0.0.1:1935/live/stream")
        .await;
    assert_eq!(
        resp.body,
        json!({"error_code": 1001, "desp": "token required"})
    );
    assert!(
        app.service
            .ledger()
            .snapshot(&BillingMonth::current())
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(app.evictor.count(), 0);

    tokio::time::sleep(Duration::from_millis(500)).await;

    let calls = app.evictor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].stream_name, "stream");
    assert_eq!(calls[0].session_id, "s1");
    let delay = calls[0].at - started;
    assert!(delay >= Duration::from_millis(200), "kicked after {delay:?}");
    assert!(delay <= Duration::from_millis(350), "kicked after {delay:?}");
}

#[tokio::test(start_paused = true)]
async fn test_empty_token_counts_as_missing() {
    let app = helpers::TestApp::new();
    let resp = app
        .start("s1", "stream", "rtmp://127.0.0.1/live/stream?token=")
        .await;
    assert_eq!(resp.error_code(), 1001);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_token_denied() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();
    app.service
        .ledger()
        .init_if_absent("abc", &month)
        .await
        .unwrap();
    app.service
        .ledger()
        .decrement_by("abc", &month, 125)
        .await
        .unwrap();

    let resp = app.start("s1", "stream", URL_ABC).await;
    assert_eq!(resp.body, json!({"error_code": 1002, "desp": "out of quota"}));
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(-5)
    );
    assert!(app.service.registry().active_streams().await.unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(app.evictor.count(), 1);
}

#[tokio::test]
async fn test_session_id_falls_back_to_id() {
    let app = helpers::TestApp::new();
    let resp = app
        .request(
            "POST",
            "/on_sub_start",
            Some(json!({"id": "legacy-1", "stream_name": "stream", "url": URL_ABC})),
        )
        .await;
    assert_eq!(resp.error_code(), 0);
    assert_eq!(
        app.service.registry().token_for("legacy-1").await.unwrap(),
        Some("abc".to_string())
    );
}

#[tokio::test]
async fn test_malformed_start_is_code_1() {
    let app = helpers::TestApp::new();

    let resp = app.request_raw("POST", "/on_sub_start", "{not json").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.error_code(), 1);

    let resp = app
        .request(
            "POST",
            "/on_sub_start",
            Some(json!({"stream_name": "stream", "url": URL_ABC})),
        )
        .await;
    assert_eq!(resp.error_code(), 1);

    let resp = app
        .request(
            "POST",
            "/on_sub_start",
            Some(json!({"session_id": "s1", "url": URL_ABC})),
        )
        .await;
    assert_eq!(resp.error_code(), 1);

    assert!(
        app.service
            .ledger()
            .snapshot(&BillingMonth::current())
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(app.evictor.count(), 0);
}

#[tokio::test]
async fn test_stop_removes_session() {
    let app = helpers::TestApp::new();
    app.start("s1", "stream", URL_ABC).await;

    let resp = app.stop("s1", "stream").await;
    assert_eq!(resp.body, json!({"error_code": 0}));
    assert!(
        app.service
            .registry()
            .active_sessions("stream")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(app.service.registry().token_for("s1").await.unwrap(), None);

    // No refund on stop.
    assert_eq!(
        app.service
            .ledger()
            .balance("abc", &BillingMonth::current())
            .await
            .unwrap(),
        Some(120)
    );

    let resp = app.stop("s1", "stream").await;
    assert_eq!(resp.error_code(), 0);
}

#[tokio::test]
async fn test_stop_for_unknown_session_is_noop() {
    let app = helpers::TestApp::new();
    app.start("s1", "stream", URL_ABC).await;

    let resp = app.stop("never-registered", "stream").await;
    assert_eq!(resp.body, json!({"error_code": 0}));
    assert_eq!(
        app.service.registry().active_sessions("stream").await.unwrap(),
        vec!["s1"]
    );
}

#[tokio::test]
async fn test_malformed_stop_still_acknowledged() {
    let app = helpers::TestApp::new();
    let resp = app.request_raw("POST", "/on_sub_stop", "garbage").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"error_code": 0}));
}
