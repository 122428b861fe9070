//! Share lifecycle service.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use quickshare_core::config::ShareConfig;
use quickshare_core::error::AppError;
use quickshare_core::traits::clock::Clock;
use quickshare_core::traits::storage::{ByteStream, StorageProvider};
use quickshare_core::types::ShareId;
use quickshare_entity::share::{ShareContent, ShareRecord};
use quickshare_storage::guess_mime;
use quickshare_store::{Lookup, ShareStore};

use super::allocator::IdAllocator;
use super::submission::{
    CreatedShare, FileUpload, StagedFile, TextSubmission, blob_name, limit_body,
    sanitize_file_name,
};
use crate::password::PasswordHasher;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An open download.
pub struct DownloadHandle {
    /// Original file name.
    pub file_name: String,
    /// MIME type to serve.
    pub content_type: String,
    /// Actual blob length in bytes.
    pub size_bytes: u64,
    /// Blob contents.
    pub body: ByteStream<'static>,
}

impl std::fmt::Debug for DownloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadHandle")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// What one cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CleanupReport {
    /// Expired share records removed.
    pub expired_shares: usize,
    /// Blobs deleted along with those records.
    pub blobs_deleted: usize,
    /// Unreferenced blobs swept.
    pub orphans_deleted: usize,
}

/// Creates, serves, deletes and expires shares.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Live share map.
    store: Arc<ShareStore>,
    /// Blob storage for file shares.
    storage: Arc<dyn StorageProvider>,
    /// Time source for expiry.
    clock: Arc<dyn Clock>,
    /// Share code allocator.
    allocator: IdAllocator,
    /// Deletion password hasher.
    hasher: PasswordHasher,
    /// Lifetime and size limits.
    limits: ShareConfig,
    /// Minimum age of an unreferenced blob before it is swept.
    orphan_grace: Duration,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        store: Arc<ShareStore>,
        storage: Arc<dyn StorageProvider>,
        clock: Arc<dyn Clock>,
        limits: ShareConfig,
        orphan_grace: Duration,
    ) -> Self {
        Self {
            allocator: IdAllocator::new(limits.id_random_attempts),
            hasher: PasswordHasher::new(),
            store,
            storage,
            clock,
            limits,
            orphan_grace,
        }
    }

    /// Number of live shares.
    pub fn active_count(&self) -> usize {
        self.store.live_count(self.clock.now())
    }

    /// Blob storage backend name and whether it is reachable.
    pub async fn storage_health(&self) -> (String, bool) {
        let provider = self.storage.provider_type().to_string();
        match self.storage.health_check().await {
            Ok(healthy) => (provider, healthy),
            Err(e) => {
                warn!(provider = %provider, error = %e, "Storage health check failed");
                (provider, false)
            }
        }
    }

    fn hash_optional(&self, password: Option<&str>) -> Result<Option<String>, AppError> {
        match password {
            Some(p) if !p.is_empty() => Ok(Some(self.hasher.hash_password(p)?)),
            _ => Ok(None),
        }
    }

    fn claim(&self, content: ShareContent, password_hash: Option<String>) -> Result<CreatedShare, AppError> {
        let now = self.clock.now();
        let placeholder = ShareId::new(0).ok_or_else(|| AppError::internal("share code 0 out of range"))?;
        let record = ShareRecord::new(placeholder, content, now, self.limits.ttl(), password_hash);
        let expires_at = record.expires_at;

        let claimed = self.allocator.claim(&self.store, record, now)?;
        if let Some(evicted) = claimed.evicted {
            debug!(share_id = %evicted.share_id, "Reused code of an expired share");
            self.spawn_blob_delete(&evicted);
        }

        Ok(CreatedShare {
            share_id: claimed.share_id,
            expires_at,
            expires_in: self.limits.ttl_seconds(),
        })
    }

    /// Share a piece of text.
    pub async fn create_text(&self, submission: TextSubmission) -> Result<CreatedShare, AppError> {
        if submission.text.is_empty() {
            return Err(AppError::validation("Text content must not be empty"));
        }
        let chars = submission.text.chars().count();
        if chars > self.limits.max_text_chars {
            return Err(AppError::payload_too_large(format!(
                "Text is {chars} characters; the limit is {}",
                self.limits.max_text_chars
            )));
        }

        let password_hash = self.hash_optional(submission.password.as_deref())?;
        let created = self.claim(
            ShareContent::Text {
                text: submission.text,
                rich_text: submission.rich_text,
            },
            password_hash,
        )?;

        info!(share_id = %created.share_id, chars, "Text share created");
        Ok(created)
    }

    /// Stream an uploaded file into blob storage.
    ///
    /// Enforces the file size limit while streaming and rejects empty
    /// files. Nothing is resolvable until the blob is committed.
    pub async fn stage_file(&self, upload: FileUpload<'_>) -> Result<StagedFile, AppError> {
        let file_name = upload
            .file_name
            .as_deref()
            .and_then(sanitize_file_name)
            .ok_or_else(|| AppError::validation("A file name is required"))?;
        let content_type = upload
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| guess_mime(&file_name).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        let storage_path = blob_name(&file_name);
        let body = limit_body(upload.body, self.limits.max_file_bytes);
        let size_bytes = self.storage.write_stream(&storage_path, body).await?;

        if size_bytes == 0 {
            self.storage.delete(&storage_path).await?;
            return Err(AppError::validation("File must not be empty"));
        }

        debug!(storage_path = %storage_path, size_bytes, "Staged upload");
        Ok(StagedFile {
            file_name,
            content_type,
            size_bytes,
            storage_path,
        })
    }

    /// Give a staged blob a share code. The blob is removed if that fails.
    pub async fn commit_file(
        &self,
        staged: StagedFile,
        password: Option<&str>,
    ) -> Result<CreatedShare, AppError> {
        let storage_path = staged.storage_path.clone();
        let file_name = staged.file_name.clone();
        let size_bytes = staged.size_bytes;
        let content = ShareContent::File {
            file_name: staged.file_name,
            content_type: staged.content_type,
            size_bytes: staged.size_bytes,
            storage_path: staged.storage_path,
        };
        let created = self
            .hash_optional(password)
            .and_then(|password_hash| self.claim(content, password_hash));

        match created {
            Ok(created) => {
                info!(share_id = %created.share_id, file_name = %file_name, size_bytes, "File share created");
                Ok(created)
            }
            Err(e) => {
                self.remove_blob(&storage_path).await;
                Err(e)
            }
        }
    }

    /// Drop a staged blob that will not be committed.
    pub async fn discard_file(&self, staged: StagedFile) {
        self.remove_blob(&staged.storage_path).await;
    }

    async fn remove_blob(&self, storage_path: &str) {
        if let Err(e) = self.storage.delete(storage_path).await {
            warn!(storage_path, error = %e, "Failed to remove unclaimed blob");
        }
    }

    /// Retrieve a share, counting the view.
    ///
    /// A file share whose blob has gone missing is removed and reported as
    /// not found.
    pub async fn get(&self, share_id: ShareId) -> Result<ShareRecord, AppError> {
        let now = self.clock.now();
        let record = self.live_or_not_found(share_id, self.store.get_and_touch(share_id, now)).await?;

        if let Some(path) = record.storage_path() {
            if !self.storage.exists(path).await? {
                warn!(share_id = %share_id, storage_path = path, "Blob missing, invalidating share");
                self.store.remove_if_created_at(share_id, record.created_at);
                return Err(not_found(share_id));
            }
        }

        debug!(share_id = %share_id, view_count = record.view_count, "Share viewed");
        Ok(record)
    }

    /// Open a file share for download, counting the download.
    pub async fn open_download(&self, share_id: ShareId) -> Result<DownloadHandle, AppError> {
        let now = self.clock.now();
        let record = self.live_or_not_found(share_id, self.store.peek(share_id, now)).await?;

        let ShareContent::File {
            file_name,
            content_type,
            storage_path,
            ..
        } = record.content
        else {
            return Err(AppError::validation(format!(
                "Share {share_id} is a text share and cannot be downloaded"
            )));
        };

        let opened = match self.storage.metadata(&storage_path).await {
            Ok(meta) => self
                .storage
                .read(&storage_path)
                .await
                .map(|body| (meta.size_bytes, body)),
            Err(e) => Err(e),
        };
        let (size_bytes, body) = match opened {
            Ok(opened) => opened,
            Err(e) if e.is_not_found() => {
                warn!(share_id = %share_id, storage_path = %storage_path, "Blob missing, invalidating share");
                self.store.remove_if_created_at(share_id, record.created_at);
                return Err(not_found(share_id));
            }
            Err(e) => return Err(e),
        };

        let counted = self.live_or_not_found(share_id, self.store.record_download(share_id, now)).await?;
        info!(
            share_id = %share_id,
            file_name = %file_name,
            size_bytes,
            download_count = counted.download_count,
            "Download started"
        );

        Ok(DownloadHandle {
            file_name,
            content_type,
            size_bytes,
            body,
        })
    }

    /// Delete a share. Requires the password it was created with.
    ///
    /// Shares created without a password cannot be deleted.
    pub async fn delete(&self, share_id: ShareId, password: Option<&str>) -> Result<(), AppError> {
        let now = self.clock.now();
        let record = self.live_or_not_found(share_id, self.store.peek(share_id, now)).await?;

        let Some(hash) = record.password_hash.as_deref() else {
            return Err(AppError::authorization(
                "This share has no password and cannot be deleted",
            ));
        };
        let Some(password) = password.filter(|p| !p.is_empty()) else {
            return Err(AppError::authorization("A password is required to delete this share"));
        };
        if !self.hasher.verify_password(password, hash)? {
            warn!(share_id = %share_id, "Share deletion rejected: wrong password");
            return Err(AppError::authorization("Wrong password"));
        }

        let removed = self
            .store
            .remove_if_created_at(share_id, record.created_at)
            .ok_or_else(|| not_found(share_id))?;
        self.delete_blob(&removed).await;

        info!(share_id = %share_id, "Share deleted");
        Ok(())
    }

    /// Remove expired shares and their blobs, then sweep blobs no live
    /// share references that are older than the orphan grace period.
    pub async fn cleanup_expired(&self) -> Result<CleanupReport, AppError> {
        let now = self.clock.now();
        let mut report = CleanupReport::default();

        let expired = self.store.purge_expired(now);
        report.expired_shares = expired.len();
        for record in &expired {
            if self.delete_blob(record).await {
                report.blobs_deleted += 1;
            }
        }

        let referenced = self.store.referenced_blobs();
        let cutoff = now - self.orphan_grace;
        for blob in self.storage.list("").await? {
            if blob.is_directory || referenced.contains(&blob.path) {
                continue;
            }
            let old_enough = blob.last_modified.is_some_and(|modified| modified < cutoff);
            if !old_enough {
                continue;
            }
            match self.storage.delete(&blob.path).await {
                Ok(()) => report.orphans_deleted += 1,
                Err(e) => warn!(path = %blob.path, error = %e, "Failed to delete orphan blob"),
            }
        }

        if report != CleanupReport::default() {
            info!(
                expired_shares = report.expired_shares,
                blobs_deleted = report.blobs_deleted,
                orphans_deleted = report.orphans_deleted,
                "Cleanup pass finished"
            );
        }
        Ok(report)
    }

    async fn live_or_not_found(&self, share_id: ShareId, lookup: Lookup) -> Result<ShareRecord, AppError> {
        match lookup {
            Lookup::Live(record) => Ok(record),
            Lookup::Expired(record) => {
                debug!(share_id = %share_id, "Share expired on access");
                self.delete_blob(&record).await;
                Err(not_found(share_id))
            }
            Lookup::Missing => Err(not_found(share_id)),
        }
    }

    async fn delete_blob(&self, record: &ShareRecord) -> bool {
        let Some(path) = record.storage_path() else {
            return false;
        };
        match self.storage.delete(path).await {
            Ok(()) => true,
            Err(e) => {
                warn!(share_id = %record.share_id, storage_path = path, error = %e, "Failed to delete blob");
                false
            }
        }
    }

    fn spawn_blob_delete(&self, record: &ShareRecord) {
        let Some(path) = record.storage_path().map(str::to_string) else {
            return;
        };
        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            if let Err(e) = storage.delete(&path).await {
                warn!(storage_path = %path, error = %e, "Failed to delete evicted blob");
            }
        });
    }
}

fn not_found(share_id: ShareId) -> AppError {
    AppError::not_found(format!("Share {share_id} does not exist or has expired"))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use chrono::Utc;
    use futures::{StreamExt, stream};
    use quickshare_core::error::ErrorKind;
    use quickshare_core::traits::clock::ManualClock;
    use quickshare_storage::LocalStorageProvider;
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        dir: TempDir,
        clock: Arc<ManualClock>,
        storage: Arc<LocalStorageProvider>,
        service: ShareService,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limits = ShareConfig {
            max_file_bytes: 64,
            max_text_chars: 10,
            ..ShareConfig::default()
        };
        let service = ShareService::new(
            Arc::new(ShareStore::new()),
            storage.clone(),
            clock.clone(),
            limits,
            Duration::hours(24),
        );
        Fixture {
            dir,
            clock,
            storage,
            service,
        }
    }

    fn text(s: &str, password: Option<&str>) -> TextSubmission {
        TextSubmission {
            text: s.to_string(),
            rich_text: false,
            password: password.map(str::to_string),
        }
    }

    fn file(name: &str, data: &'static [u8]) -> FileUpload<'static> {
        let chunks: Vec<std::io::Result<Bytes>> = data
            .chunks(5)
            .map(|c| Ok(Bytes::from_static(c)))
            .collect();
        FileUpload {
            file_name: Some(name.to_string()),
            content_type: None,
            body: Box::pin(stream::iter(chunks)),
        }
    }

    impl ShareService {
        async fn create_file(
            &self,
            upload: FileUpload<'_>,
            password: Option<&str>,
        ) -> Result<CreatedShare, AppError> {
            let staged = self.stage_file(upload).await?;
            self.commit_file(staged, password).await
        }
    }

    #[tokio::test]
    async fn test_text_limits() {
        let f = fixture().await;
        assert_eq!(
            f.service.create_text(text("", None)).await.unwrap_err().kind,
            ErrorKind::Validation
        );
        assert_eq!(
            f.service.create_text(text("abcdefghijk", None)).await.unwrap_err().kind,
            ErrorKind::PayloadTooLarge
        );
        // ten multi-byte characters fit the ten character limit
        assert!(f.service.create_text(text("éééééééééé", None)).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_counts_views_until_expiry() {
        let f = fixture().await;
        let created = f.service.create_text(text("hello", None)).await.unwrap();
        assert_eq!(created.expires_in, 86_400);

        assert_eq!(f.service.get(created.share_id).await.unwrap().view_count, 1);
        assert_eq!(f.service.get(created.share_id).await.unwrap().view_count, 2);

        f.clock.advance(Duration::hours(24) - Duration::seconds(1));
        assert!(f.service.get(created.share_id).await.is_ok());
        f.clock.advance(Duration::seconds(1));
        assert!(f.service.get(created.share_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_file_roundtrip() {
        let f = fixture().await;
        let created = f.service.create_file(file("dir/data.json", b"{\"k\": 1}"), None).await.unwrap();

        let record = f.service.get(created.share_id).await.unwrap();
        let ShareContent::File { file_name, content_type, size_bytes, .. } = &record.content else {
            panic!("expected a file share");
        };
        assert_eq!(file_name, "data.json");
        assert_eq!(content_type, "application/json");
        assert_eq!(*size_bytes, 8);

        let download = f.service.open_download(created.share_id).await.unwrap();
        assert_eq!(download.size_bytes, 8);
        let bytes: Vec<u8> = download
            .body
            .map(|c| c.unwrap().to_vec())
            .concat()
            .await;
        assert_eq!(bytes, b"{\"k\": 1}");

        // download does not count as a view
        assert_eq!(f.service.get(created.share_id).await.unwrap().view_count, 2);
    }

    #[tokio::test]
    async fn test_file_limits() {
        let f = fixture().await;
        let err = f.service.create_file(file("empty.bin", b""), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let big: &'static [u8] = &[7u8; 65];
        let err = f.service.create_file(file("big.bin", big), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);
        assert!(f.storage.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_of_text_share_rejected() {
        let f = fixture().await;
        let created = f.service.create_text(text("hello", None)).await.unwrap();
        let err = f.service.open_download(created.share_id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_blob_invalidates_share() {
        let f = fixture().await;
        let created = f.service.create_file(file("a.txt", b"abc"), None).await.unwrap();
        for blob in f.storage.list("").await.unwrap() {
            f.storage.delete(&blob.path).await.unwrap();
        }
        assert!(f.service.get(created.share_id).await.unwrap_err().is_not_found());
        assert_eq!(f.service.active_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_fails_closed() {
        let f = fixture().await;
        let open = f.service.create_text(text("open", None)).await.unwrap();
        let locked = f.service.create_text(text("locked", Some("pw"))).await.unwrap();

        let denied = |r: Result<(), AppError>| r.unwrap_err().kind == ErrorKind::Authorization;
        assert!(denied(f.service.delete(open.share_id, Some("pw")).await));
        assert!(denied(f.service.delete(locked.share_id, None).await));
        assert!(denied(f.service.delete(locked.share_id, Some("nope")).await));

        f.service.delete(locked.share_id, Some("pw")).await.unwrap();
        assert!(f.service.get(locked.share_id).await.unwrap_err().is_not_found());
        assert!(f.service.delete(locked.share_id, Some("pw")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_cleanup_removes_expired_blobs_and_old_orphans() {
        let f = fixture().await;
        let created = f.service.create_file(file("a.txt", b"abc"), None).await.unwrap();
        let orphan: Vec<std::io::Result<Bytes>> = vec![Ok(Bytes::from_static(b"x"))];
        f.storage
            .write_stream("orphan.bin", Box::pin(stream::iter(orphan)))
            .await
            .unwrap();

        let report = f.service.cleanup_expired().await.unwrap();
        assert_eq!(report, CleanupReport::default());

        f.clock.advance(Duration::hours(25));
        let report = f.service.cleanup_expired().await.unwrap();
        assert_eq!(report.expired_shares, 1);
        assert_eq!(report.blobs_deleted, 1);
        assert_eq!(report.orphans_deleted, 1);
        assert!(f.storage.list("").await.unwrap().is_empty());
        assert!(f.service.get(created.share_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_storage_health() {
        let f = fixture().await;
        assert_eq!(f.service.storage_health().await, ("local".to_string(), true));

        std::fs::remove_dir_all(f.dir.path()).unwrap();
        assert_eq!(f.service.storage_health().await, ("local".to_string(), false));
    }
}
