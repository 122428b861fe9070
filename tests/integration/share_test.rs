//! Integration tests for text shares, lookup, and health.

use std::collections::HashSet;

use http::StatusCode;
use serde_json::json;

use crate::helpers::{MAX_TEXT_CHARS, TestApp};

#[tokio::test]
async fn test_text_share_round_trip() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/share/text",
            Some(json!({ "textContent": "hello world", "isRichText": false })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let share_id = response.share_id();
    assert_eq!(share_id.len(), 4);
    assert!(share_id.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(response.body["url"], format!("/view.html?id={share_id}"));
    assert_eq!(response.body["expiresIn"], 86_400);

    let view = app
        .request("GET", &format!("/api/share?shareId={share_id}"), None, &[])
        .await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["file"], false);
    assert_eq!(view.body["textContent"], "hello world");
    assert_eq!(view.body["isRichText"], false);
    assert_eq!(view.body["textType"], "text");
    assert_eq!(view.body["passwordProtected"], false);
    assert!(view.body.get("fileName").is_none());
}

#[tokio::test]
async fn test_each_view_increments_once() {
    let app = TestApp::new().await;
    let share_id = app.share_text("counted", None).await;

    for expected in 1..=3 {
        let view = app
            .request("GET", &format!("/api/share?shareId={share_id}"), None, &[])
            .await;
        assert_eq!(view.body["viewCount"], expected);
    }

    let legacy = app
        .request("GET", &format!("/api/share/{share_id}"), None, &[])
        .await;
    assert_eq!(legacy.status, StatusCode::OK);
    assert_eq!(legacy.body["viewCount"], 4);
}

#[tokio::test]
async fn test_rich_text_alias_and_detection() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/share/text",
            Some(json!({ "textContent": "{\"a\": [1, 2]}", "richText": true })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let view = app
        .request("GET", &format!("/api/share/{}", response.share_id()), None, &[])
        .await;
    assert_eq!(view.body["isRichText"], true);
    assert_eq!(view.body["textType"], "json");
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/share/text",
            Some(json!({ "textContent": "", "isRichText": false })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_text_limit_counts_characters() {
    let app = TestApp::new().await;

    let at_limit = "é".repeat(MAX_TEXT_CHARS);
    let share_id = app.share_text(&at_limit, None).await;
    let view = app
        .request("GET", &format!("/api/share/{share_id}"), None, &[])
        .await;
    assert_eq!(view.body["textContent"], at_limit);

    let over = "a".repeat(MAX_TEXT_CHARS + 1);
    let response = app
        .request(
            "POST",
            "/api/share/text",
            Some(json!({ "textContent": over, "isRichText": false })),
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error_code(), "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = TestApp::new().await;
    let req = http::Request::builder()
        .method("POST")
        .uri("/api/share/text")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = TestApp::new().await;

    let missing = app
        .request("GET", "/api/share?shareId=9999", None, &[])
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["success"], false);
    assert_eq!(missing.error_code(), "SHARE_NOT_FOUND");

    for bad in ["12a4", "123", "12345"] {
        let response = app
            .request("GET", &format!("/api/share?shareId={bad}"), None, &[])
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "id {bad}");
    }

    let no_param = app.request("GET", "/api/share", None, &[]).await;
    assert_eq!(no_param.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_shares_get_distinct_ids() {
    let app = TestApp::new().await;

    let mut tasks = Vec::new();
    for i in 0..64 {
        let router = app.router.clone();
        tasks.push(tokio::spawn(async move {
            use tower::ServiceExt;
            let req = http::Request::builder()
                .method("POST")
                .uri("/api/share/text")
                .header("Content-Type", "application/json")
                .body(axum::body::Body::from(
                    json!({ "textContent": format!("note {i}") }).to_string(),
                ))
                .unwrap();
            let response = router.oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), 1024)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            body["shareId"].as_str().unwrap().to_string()
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        assert!(ids.insert(task.await.unwrap()));
    }
    assert_eq!(ids.len(), 64);
    assert_eq!(app.store.len(), 64);
}

#[tokio::test]
async fn test_health_reports_active_shares() {
    let app = TestApp::new().await;
    app.share_text("one", None).await;
    app.share_text("two", None).await;

    let response = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["activeShares"], 2);
    assert!(response.body["version"].is_string());
    assert_eq!(response.body["storageProvider"], "local");
    assert_eq!(response.body["storage"], "available");
}

#[tokio::test]
async fn test_health_degraded_without_storage() {
    let app = TestApp::new().await;
    tokio::fs::remove_dir_all(&app.blob_dir).await.unwrap();

    let response = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["storage"], "unavailable");
}
