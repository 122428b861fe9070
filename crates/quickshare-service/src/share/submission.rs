//! Inputs and outputs of share creation.

use std::io;

use chrono::{DateTime, Utc};
use futures::StreamExt;

use quickshare_core::traits::storage::ByteStream;
use quickshare_core::types::ShareId;

/// A text share request.
#[derive(Debug, Clone)]
pub struct TextSubmission {
    /// The text to share.
    pub text: String,
    /// Whether the uploader marked it as rich text.
    pub rich_text: bool,
    /// Optional deletion password.
    pub password: Option<String>,
}

/// A file whose body is still streaming in.
pub struct FileUpload<'a> {
    /// File name as supplied by the client.
    pub file_name: Option<String>,
    /// Content type as supplied by the client.
    pub content_type: Option<String>,
    /// The file bytes.
    pub body: ByteStream<'a>,
}

impl std::fmt::Debug for FileUpload<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// A fully written blob that no share points at yet.
///
/// Either commit it with [`ShareService::commit_file`] or hand it back to
/// [`ShareService::discard_file`].
///
/// [`ShareService::commit_file`]: crate::ShareService::commit_file
/// [`ShareService::discard_file`]: crate::ShareService::discard_file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Sanitized file name.
    pub file_name: String,
    /// Resolved content type.
    pub content_type: String,
    /// Bytes written.
    pub size_bytes: u64,
    /// Blob name inside storage.
    pub storage_path: String,
}

/// Result of a successful share creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedShare {
    /// The allocated code.
    pub share_id: ShareId,
    /// When the share stops being served.
    pub expires_at: DateTime<Utc>,
    /// Share lifetime in seconds.
    pub expires_in: u64,
}

/// Last path component of a client-supplied file name, with control
/// characters removed.
pub(crate) fn sanitize_file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let clean: String = last.chars().filter(|c| !c.is_control()).collect();
    let clean = clean.trim();
    if clean.is_empty() || clean == "." || clean == ".." {
        None
    } else {
        Some(clean.to_string())
    }
}

/// Blob name for a stored file: a random UUID plus the original extension
/// when it is short and alphanumeric.
pub(crate) fn blob_name(file_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 16
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!("{id}.{}", ext.to_ascii_lowercase())
        }
        _ => id.to_string(),
    }
}

/// Wrap `body` so it fails with [`io::ErrorKind::FileTooLarge`] once more
/// than `max_bytes` have passed through.
pub(crate) fn limit_body(body: ByteStream<'_>, max_bytes: u64) -> ByteStream<'_> {
    let mut seen = 0u64;
    Box::pin(body.map(move |chunk| {
        let chunk = chunk?;
        seen += chunk.len() as u64;
        if seen > max_bytes {
            return Err(io::Error::new(
                io::ErrorKind::FileTooLarge,
                format!("File exceeds the maximum size of {max_bytes} bytes"),
            ));
        }
        Ok(chunk)
    }))
}
