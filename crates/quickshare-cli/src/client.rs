//! HTTP client for the QuickShare API.

use std::sync::Arc;

use futures::{Stream, TryStreamExt};
use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;

use quickshare_core::types::ShareId;

use crate::error::ClientError;
use crate::model::{
    DeleteResult, ErrorBody, HealthStatus, ShareCreated, ShareView, TextShareRequest,
};
use crate::notify::Notifier;
use crate::session::UploadSession;

/// Header carrying the deletion password.
pub const SHARE_PASSWORD_HEADER: &str = "x-share-password";

/// Thin typed wrapper over the REST endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// An open download response.
#[derive(Debug)]
pub struct DownloadStream {
    /// File name from `Content-Disposition`
    pub file_name: Option<String>,
    /// Announced body length
    pub content_length: Option<u64>,
    response: Response,
}

impl DownloadStream {
    /// Body chunks as they arrive.
    pub fn chunks(self) -> impl Stream<Item = Result<bytes::Bytes, ClientError>> {
        self.response.bytes_stream().map_err(ClientError::from)
    }
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("quickshare-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Share a piece of text.
    pub async fn share_text(&self, request: &TextShareRequest) -> Result<ShareCreated, ClientError> {
        let response = self
            .http
            .post(self.url("/api/share/text"))
            .json(request)
            .send()
            .await?;
        parse_json(check(response).await?).await
    }

    /// Upload the session's file, reporting progress as bytes leave.
    pub async fn upload_file(
        &self,
        session: Arc<UploadSession>,
        rich_text: bool,
        password: Option<&str>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<ShareCreated, ClientError> {
        let file = tokio::fs::File::open(session.path()).await?;
        let total = session.size_bytes();
        let name = session.file_name().to_string();

        let progress_session = Arc::clone(&session);
        let progress_notifier = Arc::clone(&notifier);
        let stream = ReaderStream::new(file).inspect_ok(move |chunk| {
            if let Some(update) = progress_session.advance(chunk.len() as u64) {
                progress_notifier.progress("Uploading", &update);
            }
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total).file_name(name);
        let mut form = Form::new()
            .part("file", part)
            .text("isRichText", rich_text.to_string());
        if let Some(password) = password {
            form = form.text("password", password.to_string());
        }

        tracing::debug!(file = %session.path().display(), total, "Starting upload");
        let result = self
            .http
            .post(self.url("/api/share/file"))
            .multipart(form)
            .send()
            .await;
        notifier.finish_progress();

        parse_json(check(result?).await?).await
    }

    /// Fetch a share; this counts as a view.
    pub async fn get_share(&self, share_id: ShareId) -> Result<ShareView, ClientError> {
        let response = self
            .http
            .get(self.url("/api/share"))
            .query(&[("shareId", share_id.to_string())])
            .send()
            .await?;
        parse_json(check(response).await?).await
    }

    /// Start downloading a file share.
    pub async fn open_download(&self, share_id: ShareId) -> Result<DownloadStream, ClientError> {
        let response = self
            .http
            .get(self.url("/api/share/download"))
            .query(&[("shareId", share_id.to_string())])
            .send()
            .await?;
        let response = check(response).await?;

        let file_name = file_name_from_headers(response.headers());
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        Ok(DownloadStream {
            file_name,
            content_length,
            response,
        })
    }

    /// Delete a share with its password.
    pub async fn delete_share(
        &self,
        share_id: ShareId,
        password: &str,
    ) -> Result<DeleteResult, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/share/{share_id}")))
            .header(SHARE_PASSWORD_HEADER, password)
            .send()
            .await?;
        parse_json(check(response).await?).await
    }

    /// Server health.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        parse_json(check(response).await?).await
    }
}

/// Turn a non-success response into [`ClientError::Server`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Parse(e.to_string()))
}

fn file_name_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_disposition)
}

/// Extract the file name from a `Content-Disposition` value, preferring
/// the UTF-8 `filename*` form over the plain `filename` fallback.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';').map(str::trim) {
        if let Some(encoded) = param.strip_prefix("filename*=") {
            let decoded = encoded
                .strip_prefix("UTF-8''")
                .or_else(|| encoded.strip_prefix("utf-8''"))
                .and_then(|raw| percent_decode_str(raw).decode_utf8().ok())
                .map(|name| name.into_owned());
            if decoded.is_some() {
                return decoded;
            }
        } else if let Some(name) = param.strip_prefix("filename=") {
            plain = Some(name.trim_matches('"').to_string());
        }
    }
    plain.filter(|n| !n.is_empty())
}
