//! Local filesystem storage provider.
//!
//! Blobs live directly under the root directory. Blob names are single path
//! components; anything that would escape the root is rejected.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use quickshare_core::error::{AppError, ErrorKind};
use quickshare_core::result::AppResult;
use quickshare_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = path.trim_start_matches('/');
        let escapes = Path::new(clean)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AppError::validation(format!("Invalid storage path: {path}")));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn copy_stream(
        file: &mut fs::File,
        mut stream: ByteStream<'_>,
        path: &str,
    ) -> AppResult<u64> {
        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                if e.kind() == std::io::ErrorKind::FileTooLarge {
                    AppError::payload_too_large(e.to_string())
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Stream read error while writing {path}"),
                        e,
                    )
                }
            })?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        Ok(total_bytes)
    }
}

fn not_found_or_storage(e: std::io::Error, action: &str, path: &str) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Blob not found: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream<'static>> {
        let full_path = self.resolve(path)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| not_found_or_storage(e, "open blob", path))?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn write_stream(&self, path: &str, stream: ByteStream<'_>) -> AppResult<u64> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        let mut file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob: {path}"),
                e,
            )
        })?;

        match Self::copy_stream(&mut file, stream, path).await {
            Ok(total_bytes) => {
                debug!(path, bytes = total_bytes, "Wrote blob from stream");
                Ok(total_bytes)
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&full_path).await {
                    warn!(path, error = %cleanup, "Failed to remove partial blob");
                }
                Err(e)
            }
        }
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        Ok(fs::try_exists(&full_path).await.unwrap_or(false))
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let full_path = self.resolve(path)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| not_found_or_storage(e, "get metadata", path))?;

        let last_modified = meta.modified().ok().map(chrono::DateTime::<chrono::Utc>::from);

        Ok(StorageObjectMeta {
            path: path.to_string(),
            size_bytes: meta.len(),
            last_modified,
            is_directory: meta.is_dir(),
        })
    }

    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let full_path = self.resolve(path)?;
        let mut dir = match fs::read_dir(&full_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list directory: {path}"),
                    e,
                ));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = if path.is_empty() || path == "/" {
                name
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            entries.push(StorageObjectMeta {
                path: entry_path,
                size_bytes: entry_meta.len(),
                last_modified: entry_meta
                    .modified()
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from),
                is_directory: entry_meta.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
