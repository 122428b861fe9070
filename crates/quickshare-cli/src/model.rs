//! Wire types exchanged with the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickshare_core::types::ShareId;
use quickshare_entity::content::TextType;

/// Body of `POST /api/share/text`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShareRequest {
    /// The text to share
    pub text_content: String,
    /// Whether the text is rich text
    pub is_rich_text: bool,
    /// Optional deletion password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Returned when a share is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCreated {
    /// The new share code
    pub share_id: ShareId,
    /// Relative view page URL
    pub url: String,
    /// Lifetime in seconds
    pub expires_in: u64,
    /// Expiry instant, when the server reports it
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A share as returned by `GET /api/share`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    /// Share code
    pub share_id: ShareId,
    /// Whether this is a file share
    pub file: bool,
    /// Original file name
    #[serde(default)]
    pub file_name: Option<String>,
    /// File content type
    #[serde(default)]
    pub content_type: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Shared text
    #[serde(default)]
    pub text_content: Option<String>,
    /// Whether the text is rich text
    #[serde(default)]
    pub is_rich_text: Option<bool>,
    /// Server-side text classification
    #[serde(default)]
    pub text_type: Option<TextType>,
    /// Views including this one
    pub view_count: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
    /// Whether deletion needs a password
    #[serde(default)]
    pub password_protected: bool,
}

impl ShareView {
    /// The text classification, detected locally when the server omits it.
    pub fn resolved_text_type(&self) -> Option<TextType> {
        let text = self.text_content.as_deref()?;
        Some(self.text_type.unwrap_or_else(|| TextType::detect(text)))
    }
}

/// Returned by `DELETE /api/share/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Always true on success
    pub success: bool,
    /// The removed share
    pub share_id: ShareId,
}

/// Returned by `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `ok` when healthy, `degraded` when storage is unreachable
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server start
    pub uptime_seconds: u64,
    /// Number of live shares
    pub active_shares: usize,
    /// Blob storage backend
    #[serde(default)]
    pub storage_provider: Option<String>,
    /// Blob storage availability
    #[serde(default)]
    pub storage: Option<String>,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}
