//! Expired share and orphan blob cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use quickshare_service::ShareService;

use crate::executor::{JobExecutionError, JobHandler};

/// Job type name for share cleanup.
pub const SHARE_CLEANUP: &str = "share_cleanup";

/// Removes expired shares, their blobs, and stale orphan blobs.
#[derive(Debug)]
pub struct ShareCleanupHandler {
    /// Share service
    service: Arc<ShareService>,
}

impl ShareCleanupHandler {
    /// Create a new cleanup job handler
    pub fn new(service: Arc<ShareService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for ShareCleanupHandler {
    fn job_type(&self) -> &str {
        SHARE_CLEANUP
    }

    async fn execute(&self) -> Result<Option<Value>, JobExecutionError> {
        tracing::debug!("Running share cleanup");

        let report = self
            .service
            .cleanup_expired()
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Share cleanup failed: {e}")))?;

        Ok(Some(serde_json::json!({
            "task": SHARE_CLEANUP,
            "expired_shares_removed": report.expired_shares,
            "blobs_deleted": report.blobs_deleted,
            "orphans_deleted": report.orphans_deleted,
        })))
    }
}
