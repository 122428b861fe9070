//! Storage provider trait for pluggable blob storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Path within the storage provider.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this is a directory.
    pub is_directory: bool,
}

/// A byte stream used for reading and writing blob contents.
///
/// The lifetime lets callers stream request bodies that borrow from the
/// request without buffering them first.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + 'a>>;

/// Trait for blob storage backends.
///
/// The trait is defined in `quickshare-core` and implemented in
/// `quickshare-storage`. Paths are relative to the provider root.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a blob and return its byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream<'static>>;

    /// Write a byte stream to a blob, returning the number of bytes written.
    ///
    /// A stream error leaves no partial blob behind. A stream error of kind
    /// [`std::io::ErrorKind::FileTooLarge`] is reported as a
    /// payload-too-large error.
    async fn write_stream(&self, path: &str, stream: ByteStream<'_>) -> AppResult<u64>;

    /// Delete a blob. Deleting a missing blob is not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about a blob.
    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta>;

    /// List the contents of a directory.
    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>>;
}
