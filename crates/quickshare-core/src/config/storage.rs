//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Directory holding uploaded file blobs.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_local_root() -> String {
    "./data/files".to_string()
}
