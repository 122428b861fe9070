//! Periodic flush of the share metadata snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use quickshare_store::{ShareStore, SnapshotFile};

use crate::executor::{JobExecutionError, JobHandler};

/// Job type name for snapshot flushing.
pub const SNAPSHOT_FLUSH: &str = "snapshot_flush";

/// Writes the share map to its snapshot file when it changed.
#[derive(Debug)]
pub struct SnapshotFlushHandler {
    store: Arc<ShareStore>,
    snapshot: SnapshotFile,
}

impl SnapshotFlushHandler {
    /// Create a new snapshot flush handler
    pub fn new(store: Arc<ShareStore>, snapshot: SnapshotFile) -> Self {
        Self { store, snapshot }
    }
}

#[async_trait]
impl JobHandler for SnapshotFlushHandler {
    fn job_type(&self) -> &str {
        SNAPSHOT_FLUSH
    }

    async fn execute(&self) -> Result<Option<Value>, JobExecutionError> {
        let written = self
            .snapshot
            .flush(&self.store)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Snapshot flush failed: {e}")))?;

        Ok(written.map(|records| {
            serde_json::json!({
                "task": SNAPSHOT_FLUSH,
                "records_written": records,
            })
        }))
    }
}
