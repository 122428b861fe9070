//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickshare_core::types::ShareId;
use quickshare_entity::content::TextType;
use quickshare_entity::share::{ShareContent, ShareRecord};
use quickshare_service::CreatedShare;

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Response to a successful share creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareResponse {
    /// The four-digit code.
    pub share_id: ShareId,
    /// Front-end page that shows the share.
    pub url: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    /// Absolute expiry time.
    pub expires_at: DateTime<Utc>,
}

impl From<CreatedShare> for CreateShareResponse {
    fn from(created: CreatedShare) -> Self {
        Self {
            url: format!("/view.html?id={}", created.share_id),
            share_id: created.share_id,
            expires_in: created.expires_in,
            expires_at: created.expires_at,
        }
    }
}

/// A share as shown to a recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareViewResponse {
    /// The four-digit code.
    pub share_id: ShareId,
    /// Whether this is a file share.
    pub file: bool,
    /// File name (file shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Content type (file shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes (file shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// The text (text shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Rich text flag (text shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_rich_text: Option<bool>,
    /// Detected text type (text shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_type: Option<TextType>,
    /// Views so far, including this one.
    pub view_count: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Whether the share can be deleted with a password.
    pub password_protected: bool,
}

impl From<ShareRecord> for ShareViewResponse {
    fn from(record: ShareRecord) -> Self {
        let password_protected = record.password_protected();
        let mut view = Self {
            share_id: record.share_id,
            file: false,
            file_name: None,
            content_type: None,
            size: None,
            text_content: None,
            is_rich_text: None,
            text_type: None,
            view_count: record.view_count,
            created_at: record.created_at,
            expires_at: record.expires_at,
            password_protected,
        };
        match record.content {
            ShareContent::File {
                file_name,
                content_type,
                size_bytes,
                ..
            } => {
                view.file = true;
                view.file_name = Some(file_name);
                view.content_type = Some(content_type);
                view.size = Some(size_bytes);
            }
            ShareContent::Text { text, rich_text } => {
                view.text_type = Some(TextType::detect(&text));
                view.text_content = Some(text);
                view.is_rich_text = Some(rich_text);
            }
        }
        view
    }
}

/// Response to a successful deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteShareResponse {
    /// Always `true`.
    pub success: bool,
    /// The deleted code.
    pub share_id: ShareId,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Live shares.
    pub active_shares: usize,
    /// Blob storage backend.
    pub storage_provider: String,
    /// `available` or `unavailable`.
    pub storage: String,
}
