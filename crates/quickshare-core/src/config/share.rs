//! Share lifetime and payload limits.

use serde::{Deserialize, Serialize};

/// Limits applied to every share submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Lifetime of a share in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Maximum accepted file size in bytes (default 500 MiB).
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Maximum accepted text length in characters.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
    /// Random ID draws before the allocator falls back to probing.
    #[serde(default = "default_id_random_attempts")]
    pub id_random_attempts: usize,
}

impl ShareConfig {
    /// Share lifetime as a chrono duration.
    pub fn ttl(&self) -> chrono::Duration {
        hours_to_duration(self.ttl_hours)
    }

    /// Share lifetime in seconds, as reported to clients.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_hours.saturating_mul(3600)
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            max_file_bytes: default_max_file_bytes(),
            max_text_chars: default_max_text_chars(),
            id_random_attempts: default_id_random_attempts(),
        }
    }
}

/// Hours as a chrono duration, saturating instead of overflowing.
pub(crate) fn hours_to_duration(hours: u64) -> chrono::Duration {
    i64::try_from(hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .unwrap_or(chrono::Duration::MAX)
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_max_file_bytes() -> u64 {
    524_288_000 // 500 MiB
}

fn default_max_text_chars() -> usize {
    50_000
}

fn default_id_random_attempts() -> usize {
    10
}
