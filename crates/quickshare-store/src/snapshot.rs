//! JSON snapshot of the share map.
//!
//! The file holds a JSON object keyed by share code. Writes go to a sibling
//! temp file which is then renamed over the target.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use quickshare_core::error::{AppError, ErrorKind};
use quickshare_core::result::AppResult;
use quickshare_entity::share::ShareRecord;

use crate::memory::ShareStore;

/// A snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Point at a snapshot file. Nothing is read or created yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read every record from the file. A missing file yields no records.
    pub async fn load(&self) -> AppResult<Vec<ShareRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read snapshot {}", self.path.display()),
                    e,
                ));
            }
        };
        let map: BTreeMap<String, ShareRecord> = serde_json::from_slice(&bytes)?;
        Ok(map.into_values().collect())
    }

    /// Write `records`, replacing the previous snapshot atomically.
    pub async fn save(&self, records: &[ShareRecord]) -> AppResult<()> {
        let map: BTreeMap<String, &ShareRecord> = records
            .iter()
            .map(|record| (record.share_id.to_string(), record))
            .collect();
        let json = serde_json::to_vec_pretty(&map)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Load the snapshot into `store`, dropping records expired at `now`.
    ///
    /// A corrupt snapshot is logged and skipped so the server can still
    /// start with an empty store.
    pub async fn restore_into(&self, store: &ShareStore, now: DateTime<Utc>) -> usize {
        match self.load().await {
            Ok(records) => {
                let total = records.len();
                let loaded = store.restore(records, now);
                info!(
                    path = %self.path.display(),
                    loaded,
                    dropped = total - loaded,
                    "Restored share snapshot"
                );
                loaded
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable share snapshot");
                0
            }
        }
    }

    /// Write the store out if it changed since the last flush.
    ///
    /// Returns the number of records written, or `None` when nothing
    /// changed. On failure the store stays dirty so the next flush retries.
    pub async fn flush(&self, store: &ShareStore) -> AppResult<Option<usize>> {
        if !store.take_dirty() {
            return Ok(None);
        }
        let records = store.snapshot();
        if let Err(e) = self.save(&records).await {
            store.mark_dirty();
            return Err(e);
        }
        debug!(path = %self.path.display(), count = records.len(), "Flushed share snapshot");
        Ok(Some(records.len()))
    }
}
