//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance configuration.
///
/// Schedules use six-field cron expressions (seconds first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Schedule for purging expired shares and orphan blobs.
    #[serde(default = "default_cleanup_schedule")]
    pub cleanup_schedule: String,
    /// Schedule for flushing the metadata snapshot.
    #[serde(default = "default_snapshot_schedule")]
    pub snapshot_schedule: String,
    /// Minimum age in hours before an unreferenced blob is swept.
    #[serde(default = "default_orphan_grace_hours")]
    pub orphan_grace_hours: u64,
}

impl WorkerConfig {
    /// Orphan grace period as a chrono duration.
    pub fn orphan_grace(&self) -> chrono::Duration {
        super::share::hours_to_duration(self.orphan_grace_hours)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_schedule: default_cleanup_schedule(),
            snapshot_schedule: default_snapshot_schedule(),
            orphan_grace_hours: default_orphan_grace_hours(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_schedule() -> String {
    "0 */5 * * * *".to_string()
}

fn default_snapshot_schedule() -> String {
    "*/30 * * * * *".to_string()
}

fn default_orphan_grace_hours() -> u64 {
    24
}
