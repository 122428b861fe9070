//! Integration tests for password-gated deletion.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_delete_with_correct_password() {
    let app = TestApp::new().await;
    let share_id = app.share_text("secret", Some("hunter2")).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/share/{share_id}"),
            None,
            &[("X-Share-Password", "hunter2")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["shareId"], share_id.as_str());

    let view = app
        .request("GET", &format!("/api/share/{share_id}"), None, &[])
        .await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_fails_closed() {
    let app = TestApp::new().await;
    let protected = app.share_text("secret", Some("hunter2")).await;
    let open = app.share_text("public", None).await;

    let cases = [
        (protected.as_str(), None),
        (protected.as_str(), Some("wrong")),
        (protected.as_str(), Some("")),
        (open.as_str(), Some("anything")),
        (open.as_str(), None),
    ];
    for (share_id, password) in cases {
        let headers: Vec<(&str, &str)> = password
            .map(|p| vec![("X-Share-Password", p)])
            .unwrap_or_default();
        let response = app
            .request("DELETE", &format!("/api/share/{share_id}"), None, &headers)
            .await;
        assert_eq!(
            response.status,
            StatusCode::FORBIDDEN,
            "share {share_id} password {password:?}"
        );
        assert_eq!(response.error_code(), "ACCESS_DENIED");
    }

    assert_eq!(app.store.len(), 2);
}

#[tokio::test]
async fn test_delete_unknown_share() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "DELETE",
            "/api/share/0001",
            None,
            &[("X-Share-Password", "pw")],
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_file_share_removes_blob() {
    let app = TestApp::new().await;
    let share_id = app.upload_file("doc.txt", b"contents", Some("pw")).await;
    assert_eq!(app.blob_names().await.len(), 1);

    let response = app
        .request(
            "DELETE",
            &format!("/api/share/{share_id}"),
            None,
            &[("X-Share-Password", "pw")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.blob_names().await.is_empty());
}
