//! Shared test helpers for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use chrono::{TimeZone, Utc};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use quickshare_core::config::AppConfig;
use quickshare_core::traits::ManualClock;
use quickshare_service::ShareService;
use quickshare_storage::LocalStorageProvider;
use quickshare_store::ShareStore;

/// File size limit used by the test app.
pub const MAX_FILE_BYTES: u64 = 1024;

/// Text length limit used by the test app.
pub const MAX_TEXT_CHARS: usize = 100;

const MULTIPART_BOUNDARY: &str = "quickshare-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock driving expiry
    pub clock: Arc<ManualClock>,
    /// The service behind the router
    pub service: Arc<ShareService>,
    /// Share metadata
    pub store: Arc<ShareStore>,
    /// Where blobs are written
    pub blob_dir: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let blob_dir = dir.path().join("files");
        let static_dir = dir.path().join("static");
        tokio::fs::create_dir_all(&static_dir)
            .await
            .expect("Failed to create static dir");
        tokio::fs::write(static_dir.join("view.html"), "<html>view</html>")
            .await
            .expect("Failed to write view page");

        let mut config = AppConfig::default();
        config.share.max_file_bytes = MAX_FILE_BYTES;
        config.share.max_text_chars = MAX_TEXT_CHARS;
        config.server.static_dir = Some(static_dir.to_string_lossy().into_owned());
        config.storage.local.root_path = blob_dir.to_string_lossy().into_owned();

        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let store = Arc::new(ShareStore::new());
        let storage = LocalStorageProvider::new(&blob_dir)
            .await
            .expect("Failed to init storage");

        let service = Arc::new(ShareService::new(
            Arc::clone(&store),
            Arc::new(storage),
            clock.clone(),
            config.share.clone(),
            chrono::Duration::hours(24),
        ));

        let state = quickshare_api::AppState::new(Arc::new(config), Arc::clone(&service));
        let router = quickshare_api::build_router(state);

        Self {
            router,
            clock,
            service,
            store,
            blob_dir,
            _dir: dir,
        }
    }

    /// Send a raw request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Share text and return the new share code
    pub async fn share_text(&self, text: &str, password: Option<&str>) -> String {
        let mut body = serde_json::json!({ "textContent": text, "isRichText": false });
        if let Some(password) = password {
            body["password"] = Value::from(password);
        }
        let response = self.request("POST", "/api/share/text", Some(body), &[]).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.share_id()
    }

    /// Upload a file as multipart/form-data
    pub async fn upload(&self, parts: &[Part<'_>]) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/api/share/file")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload one file and return the new share code
    pub async fn upload_file(&self, name: &str, bytes: &[u8], password: Option<&str>) -> String {
        let mut parts = vec![
            Part::File {
                name: "file",
                file_name: name,
                content_type: Some("text/plain"),
                bytes,
            },
            Part::Text {
                name: "isRichText",
                value: "false",
            },
        ];
        if let Some(password) = password {
            parts.push(Part::Text {
                name: "password",
                value: password,
            });
        }
        let response = self.upload(&parts).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.share_id()
    }

    /// Names of the blobs currently on disk
    pub async fn blob_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(&self.blob_dir).await else {
            return names;
        };
        while let Some(entry) = entries.next_entry().await.expect("Failed to read blob dir") {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        names
    }
}

/// One multipart form part
pub enum Part<'a> {
    /// A plain form field
    Text {
        /// Field name
        name: &'a str,
        /// Field value
        value: &'a str,
    },
    /// A file field
    File {
        /// Field name
        name: &'a str,
        /// Client-side file name
        file_name: &'a str,
        /// Declared content type
        content_type: Option<&'a str>,
        /// File bytes
        bytes: &'a [u8],
    },
}

/// Encode parts as a multipart/form-data body
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Bytes,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
}

impl TestResponse {
    /// The `shareId` field of a JSON body
    pub fn share_id(&self) -> String {
        self.body["shareId"]
            .as_str()
            .expect("No shareId in response")
            .to_string()
    }

    /// The machine-readable `error` code of a failure body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// A response header as a string
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
