//! Share entity model.

use chrono::{DateTime, Duration, Utc};
use quickshare_core::types::ShareId;
use serde::{Deserialize, Serialize};

/// What a share carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShareContent {
    /// An uploaded file stored as a blob.
    File {
        /// Original file name as supplied by the uploader.
        file_name: String,
        /// MIME type served on download.
        content_type: String,
        /// Blob length in bytes.
        size_bytes: u64,
        /// Blob name inside the storage root.
        storage_path: String,
    },
    /// A pasted text.
    Text {
        /// The text itself.
        text: String,
        /// Whether the uploader marked the text as rich text.
        rich_text: bool,
    },
}

/// A live or expired share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// The four-digit share code.
    pub share_id: ShareId,
    /// File or text payload.
    pub content: ShareContent,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// When the share stops being served.
    pub expires_at: DateTime<Utc>,
    /// Successful retrievals so far.
    pub view_count: u64,
    /// Downloads started so far.
    #[serde(default)]
    pub download_count: u64,
    /// Argon2 hash of the deletion password, if one was set.
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl ShareRecord {
    /// Create a fresh record that lives for `ttl` from `now`.
    pub fn new(
        share_id: ShareId,
        content: ShareContent,
        now: DateTime<Utc>,
        ttl: Duration,
        password_hash: Option<String>,
    ) -> Self {
        Self {
            share_id,
            content,
            created_at: now,
            expires_at: now + ttl,
            view_count: 0,
            download_count: 0,
            password_hash,
        }
    }

    /// A share is served strictly before its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether this share carries a file.
    pub fn is_file(&self) -> bool {
        matches!(self.content, ShareContent::File { .. })
    }

    /// Blob name for file shares.
    pub fn storage_path(&self) -> Option<&str> {
        match &self.content {
            ShareContent::File { storage_path, .. } => Some(storage_path),
            ShareContent::Text { .. } => None,
        }
    }

    /// Whether deletion requires a password.
    pub fn password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}
