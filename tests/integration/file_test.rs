//! Integration tests for file uploads and downloads.

use http::StatusCode;

use crate::helpers::{MAX_FILE_BYTES, Part, TestApp};

#[tokio::test]
async fn test_upload_then_download_is_byte_exact() {
    let app = TestApp::new().await;
    let content: Vec<u8> = (0..=255u8).cycle().take(700).collect();

    let share_id = app.upload_file("notes.txt", &content, None).await;

    let view = app
        .request("GET", &format!("/api/share?shareId={share_id}"), None, &[])
        .await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["file"], true);
    assert_eq!(view.body["fileName"], "notes.txt");
    assert_eq!(view.body["contentType"], "text/plain");
    assert_eq!(view.body["size"], 700);
    assert!(view.body.get("textContent").is_none());

    let download = app
        .request(
            "GET",
            &format!("/api/share/download?shareId={share_id}"),
            None,
            &[],
        )
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.bytes.as_ref(), content.as_slice());
    assert_eq!(download.header("content-length"), "700");
    assert_eq!(download.header("content-type"), "text/plain");
    assert!(download.header("content-disposition").starts_with("attachment;"));
    assert!(download.header("cache-control").contains("no-cache"));

    // Downloads do not count as views.
    let again = app
        .request("GET", &format!("/api/share/{share_id}"), None, &[])
        .await;
    assert_eq!(again.body["viewCount"], 2);
}

#[tokio::test]
async fn test_download_keeps_utf8_file_name() {
    let app = TestApp::new().await;
    let share_id = app.upload_file("报告.txt", b"quarterly", None).await;

    let download = app
        .request(
            "GET",
            &format!("/api/share/download?shareId={share_id}"),
            None,
            &[],
        )
        .await;
    assert!(
        download
            .header("content-disposition")
            .contains("filename*=UTF-8''%E6%8A%A5%E5%91%8A.txt")
    );
}

#[tokio::test]
async fn test_content_type_falls_back_to_extension() {
    let app = TestApp::new().await;
    let response = app
        .upload(&[Part::File {
            name: "file",
            file_name: "page.html",
            content_type: None,
            bytes: b"<p>hi</p>",
        }])
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let view = app
        .request("GET", &format!("/api/share/{}", response.share_id()), None, &[])
        .await;
    assert_eq!(view.body["contentType"], "text/html");
}

#[tokio::test]
async fn test_fields_may_precede_the_file() {
    let app = TestApp::new().await;
    let response = app
        .upload(&[
            Part::Text {
                name: "password",
                value: "pw",
            },
            Part::Text {
                name: "isRichText",
                value: "true",
            },
            Part::File {
                name: "file",
                file_name: "a.bin",
                content_type: Some("application/octet-stream"),
                bytes: b"\x00\x01",
            },
        ])
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let view = app
        .request("GET", &format!("/api/share/{}", response.share_id()), None, &[])
        .await;
    assert_eq!(view.body["passwordProtected"], true);
}

#[tokio::test]
async fn test_oversize_upload_is_rejected_and_cleaned_up() {
    let app = TestApp::new().await;
    let content = vec![7u8; MAX_FILE_BYTES as usize + 1];

    let response = app
        .upload(&[Part::File {
            name: "file",
            file_name: "big.bin",
            content_type: None,
            bytes: &content,
        }])
        .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error_code(), "PAYLOAD_TOO_LARGE");
    assert!(app.blob_names().await.is_empty());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_file_at_limit_is_accepted() {
    let app = TestApp::new().await;
    let content = vec![1u8; MAX_FILE_BYTES as usize];
    let share_id = app.upload_file("exact.bin", &content, None).await;

    let view = app
        .request("GET", &format!("/api/share/{share_id}"), None, &[])
        .await;
    assert_eq!(view.body["size"], MAX_FILE_BYTES);
}

#[tokio::test]
async fn test_empty_or_missing_file_is_rejected() {
    let app = TestApp::new().await;

    let empty = app
        .upload(&[Part::File {
            name: "file",
            file_name: "empty.txt",
            content_type: Some("text/plain"),
            bytes: b"",
        }])
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let missing = app
        .upload(&[Part::Text {
            name: "isRichText",
            value: "false",
        }])
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error_code(), "VALIDATION_ERROR");

    assert!(app.blob_names().await.is_empty());
}

#[tokio::test]
async fn test_text_share_cannot_be_downloaded() {
    let app = TestApp::new().await;
    let share_id = app.share_text("just words", None).await;

    let response = app
        .request(
            "GET",
            &format!("/api/share/download?shareId={share_id}"),
            None,
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_blob_invalidates_share() {
    let app = TestApp::new().await;
    let share_id = app.upload_file("gone.txt", b"soon gone", None).await;

    for blob in app.blob_names().await {
        tokio::fs::remove_file(app.blob_dir.join(blob)).await.unwrap();
    }

    let view = app
        .request("GET", &format!("/api/share/{share_id}"), None, &[])
        .await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_view_pages_are_served() {
    let app = TestApp::new().await;

    for path in ["/view.html?id=0042", "/view/0042"] {
        let response = app.request("GET", path, None, &[]).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert_eq!(response.bytes.as_ref(), b"<html>view</html>");
    }
}
