//! Per-transfer state passed through the upload and download commands.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use quickshare_core::types::ShareId;

use crate::error::ClientError;
use crate::format::format_size;
use crate::progress::{ProgressUpdate, TransferProgress};

/// Largest file the server accepts by default.
pub const MAX_FILE_BYTES: u64 = 500 * 1024 * 1024;

/// Longest text the server accepts by default, in characters.
pub const MAX_TEXT_CHARS: usize = 50_000;

/// Reject text the server would refuse.
pub fn check_text(text: &str, max_chars: usize) -> Result<(), ClientError> {
    if text.is_empty() {
        return Err(ClientError::validation("Text content must not be empty"));
    }
    let chars = text.chars().count();
    if chars > max_chars {
        return Err(ClientError::validation(format!(
            "Text is {chars} characters, the limit is {max_chars}"
        )));
    }
    Ok(())
}

/// A file about to be uploaded.
#[derive(Debug)]
pub struct UploadSession {
    path: PathBuf,
    file_name: String,
    size_bytes: u64,
    progress: Mutex<TransferProgress>,
}

impl UploadSession {
    /// Inspect `path` and check it against `max_bytes`.
    pub async fn prepare(
        path: &Path,
        name_override: Option<&str>,
        max_bytes: u64,
    ) -> Result<Self, ClientError> {
        let meta = tokio::fs::metadata(path).await.map_err(|e| {
            ClientError::validation(format!("Cannot read {}: {e}", path.display()))
        })?;
        if !meta.is_file() {
            return Err(ClientError::validation(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let size_bytes = meta.len();
        if size_bytes == 0 {
            return Err(ClientError::validation("Cannot share an empty file"));
        }
        if size_bytes > max_bytes {
            return Err(ClientError::validation(format!(
                "File is {}, the limit is {}",
                format_size(size_bytes),
                format_size(max_bytes)
            )));
        }

        let file_name = match name_override {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size_bytes,
            progress: Mutex::new(TransferProgress::new(size_bytes, Instant::now())),
        })
    }

    /// Local path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name sent to the server.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Count `bytes` as sent, returning an update when one is due.
    pub fn advance(&self, bytes: u64) -> Option<ProgressUpdate> {
        self.progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .advance(bytes, Instant::now())
    }
}

/// A download being written to disk.
#[derive(Debug)]
pub struct DownloadSession {
    share_id: ShareId,
    destination: PathBuf,
    progress: TransferProgress,
}

impl DownloadSession {
    /// Start a download of `total` bytes into `destination`.
    pub fn new(share_id: ShareId, destination: PathBuf, total: u64) -> Self {
        Self {
            share_id,
            destination,
            progress: TransferProgress::new(total, Instant::now()),
        }
    }

    /// The share being downloaded.
    pub fn share_id(&self) -> ShareId {
        self.share_id
    }

    /// Where the bytes are written.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Bytes written so far.
    pub fn received(&self) -> u64 {
        self.progress.loaded()
    }

    /// Bytes the server announced.
    pub fn expected(&self) -> u64 {
        self.progress.total()
    }

    /// Count `bytes` as received, returning an update when one is due.
    pub fn advance(&mut self, bytes: u64) -> Option<ProgressUpdate> {
        self.progress.advance(bytes, Instant::now())
    }
}

/// Choose where a download lands.
///
/// An explicit directory gets the server-provided name appended. Without an
/// explicit path the server name is used in the current directory. Only the
/// last component of the server name is kept.
pub fn download_destination(output: Option<&Path>, server_name: Option<&str>) -> PathBuf {
    let name = server_name
        .and_then(|n| Path::new(n).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("download"));
    match output {
        Some(path) if path.is_dir() => path.join(name),
        Some(path) => path.to_path_buf(),
        None => name,
    }
}
