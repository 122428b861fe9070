//! Share metadata store configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-memory share store and its snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Whether share metadata is persisted to a snapshot file.
    #[serde(default = "default_true")]
    pub snapshot_enabled: bool,
    /// Path of the JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_enabled: true,
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_snapshot_path() -> String {
    "./data/shares_metadata.json".to_string()
}
