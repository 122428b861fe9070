//! Integration tests for share expiry and cleanup.

use chrono::Duration;
use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_share_is_served_until_expiry() {
    let app = TestApp::new().await;
    let share_id = app.share_text("short lived", None).await;
    let path = format!("/api/share/{share_id}");

    app.clock.advance(Duration::hours(24) - Duration::seconds(1));
    assert_eq!(app.request("GET", &path, None, &[]).await.status, StatusCode::OK);

    app.clock.advance(Duration::seconds(1));
    let expired = app.request("GET", &path, None, &[]).await;
    assert_eq!(expired.status, StatusCode::NOT_FOUND);
    assert_eq!(expired.error_code(), "SHARE_NOT_FOUND");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_expired_file_blob_is_removed_on_access() {
    let app = TestApp::new().await;
    let share_id = app.upload_file("old.txt", b"old bytes", None).await;
    assert_eq!(app.blob_names().await.len(), 1);

    app.clock.advance(Duration::hours(25));
    let download = app
        .request(
            "GET",
            &format!("/api/share/download?shareId={share_id}"),
            None,
            &[],
        )
        .await;
    assert_eq!(download.status, StatusCode::NOT_FOUND);
    assert!(app.blob_names().await.is_empty());
}

#[tokio::test]
async fn test_cleanup_purges_expired_shares_and_blobs() {
    let app = TestApp::new().await;
    app.upload_file("a.txt", b"aaa", None).await;
    app.share_text("text", None).await;

    app.clock.advance(Duration::hours(12));
    let fresh = app.share_text("still fresh", None).await;

    app.clock.advance(Duration::hours(13));
    let report = app.service.cleanup_expired().await.unwrap();
    assert_eq!(report.expired_shares, 2);
    assert_eq!(report.blobs_deleted, 1);
    assert!(app.blob_names().await.is_empty());

    let response = app
        .request("GET", &format!("/api/share/{fresh}"), None, &[])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_shares_stop_counting_as_active() {
    let app = TestApp::new().await;
    app.share_text("first", None).await;
    app.clock.advance(Duration::hours(24));

    let health = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(health.body["activeShares"], 0);

    app.share_text("second", None).await;
    let health = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(health.body["activeShares"], 1);
}
