//! Integration tests for the enforcement sweep.

mod helpers;

use serde_json::json;

use quotagate_core::types::BillingMonth;
use quotagate_worker::{CycleOutcome, SkipReason};

const URL_ABC: &str = "rtmp://127.0.0.1:1935/live/stream?token=abc";

async fn tick(app: &helpers::TestApp, month: &BillingMonth, window: u64) -> CycleOutcome {
    app.enforcer().run_cycle_at(month, window).await.unwrap()
}

#[tokio::test]
async fn test_default_quota_exhausted_after_24_ticks() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();

    let resp = app.start("s1", "stream", URL_ABC).await;
    assert_eq!(resp.error_code(), 0);
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(120)
    );

    for window in 1..=23 {
        assert!(matches!(
            tick(&app, &month, window).await,
            CycleOutcome::Completed(_)
        ));
    }
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(5)
    );
    assert_eq!(app.evictor.count(), 0);

    let CycleOutcome::Completed(report) = tick(&app, &month, 24).await else {
        panic!("24th cycle did not run");
    };
    assert_eq!(report.sessions_evicted, 1);
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(0)
    );
    assert_eq!(
        app.evictor.targets(),
        vec![("stream".to_string(), "s1".to_string())]
    );
    assert!(
        !app.service
            .registry()
            .active_sessions("stream")
            .await
            .unwrap()
            .contains(&"s1".to_string())
    );

    // Further ticks find nothing to bill or kick.
    tick(&app, &month, 25).await;
    assert_eq!(app.evictor.count(), 1);
    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(0)
    );

    // And the exhausted token is now refused.
    let resp = app.start("s2", "stream", URL_ABC).await;
    assert_eq!(resp.error_code(), 1002);
}

#[tokio::test]
async fn test_shared_token_drains_faster() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();
    app.start("s1", "cam-a", URL_ABC).await;
    app.start("s2", "cam-b", URL_ABC).await;

    for window in 1..=12 {
        tick(&app, &month, window).await;
    }

    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(0)
    );
    // Only the session whose charge reached zero is kicked so far.
    assert_eq!(app.evictor.count(), 1);

    tick(&app, &month, 13).await;
    assert_eq!(app.evictor.count(), 2);
    assert!(app.service.registry().active_streams().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stopped_session_not_billed() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();
    app.start("s1", "stream", URL_ABC).await;
    tick(&app, &month, 1).await;

    app.stop("s1", "stream").await;
    tick(&app, &month, 2).await;
    tick(&app, &month, 3).await;

    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(115)
    );
}

#[tokio::test]
async fn test_same_window_billed_once() {
    let app = helpers::TestApp::new();
    let month = BillingMonth::current();
    app.start("s1", "stream", URL_ABC).await;

    // Two replicas racing for the same window.
    let first = app.enforcer();
    let second = app.enforcer();
    assert!(matches!(
        first.run_cycle_at(&month, 42).await.unwrap(),
        CycleOutcome::Completed(_)
    ));
    assert_eq!(
        second.run_cycle_at(&month, 42).await.unwrap(),
        CycleOutcome::Skipped(SkipReason::WindowClaimed)
    );

    assert_eq!(
        app.service.ledger().balance("abc", &month).await.unwrap(),
        Some(115)
    );
}

#[tokio::test]
async fn test_sessions_endpoint_tracks_lifecycle() {
    let app = helpers::TestApp::new();
    app.start("s1", "stream", URL_ABC).await;
    app.start("s2", "stream", "rtmp://127.0.0.1/live/stream?token=xyz").await;

    let resp = app.request("GET", "/sessions", None).await;
    assert_eq!(
        resp.body,
        json!({"streams": {"stream": [
            {"session_id": "s1", "token": "abc"},
            {"session_id": "s2", "token": "xyz"}
        ]}})
    );

    app.stop("s1", "stream").await;
    let resp = app.request("GET", "/sessions", None).await;
    assert_eq!(
        resp.body,
        json!({"streams": {"stream": [{"session_id": "s2", "token": "xyz"}]}})
    );
}
