//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so a missing file still
//! produces a runnable configuration.

pub mod app;
pub mod logging;
pub mod share;
pub mod storage;
pub mod store;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::share::ShareConfig;
pub use self::storage::{LocalStorageConfig, StorageConfig};
pub use self::store::StoreConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "QUICKSHARE";

/// Upper bound for any hour-valued setting (ten years).
pub const MAX_CONFIG_HOURS: u64 = 24 * 365 * 10;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Share limits and lifetime.
    #[serde(default)]
    pub share: ShareConfig,
    /// Share metadata store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `{dir}/default.toml` with the `{dir}/{env}.toml` overlay and
    /// environment variables such as `QUICKSHARE__SERVER__PORT=9000`.
    /// Both files are optional.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot serve any request.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.share.ttl_hours == 0 {
            return Err(AppError::configuration("share.ttl_hours must be positive"));
        }
        if self.share.ttl_hours > MAX_CONFIG_HOURS {
            return Err(AppError::configuration(format!(
                "share.ttl_hours must be at most {MAX_CONFIG_HOURS}"
            )));
        }
        if self.worker.orphan_grace_hours > MAX_CONFIG_HOURS {
            return Err(AppError::configuration(format!(
                "worker.orphan_grace_hours must be at most {MAX_CONFIG_HOURS}"
            )));
        }
        if self.share.max_text_chars == 0 {
            return Err(AppError::configuration(
                "share.max_text_chars must be positive",
            ));
        }
        if self.share.max_file_bytes == 0 {
            return Err(AppError::configuration(
                "share.max_file_bytes must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_share_limits() {
        let config = AppConfig::default();
        assert_eq!(config.share.ttl_hours, 24);
        assert_eq!(config.share.max_text_chars, 50_000);
        assert_eq!(config.share.max_file_bytes, 500 * 1024 * 1024);
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = std::env::temp_dir().join("quickshare-missing-config-dir");
        let config = AppConfig::load(dir.to_str().unwrap(), "nowhere").expect("defaults load");
        assert_eq!(config.worker.cleanup_schedule, "0 */5 * * * *");
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.share.ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_hour_values_rejected() {
        let mut config = AppConfig::default();
        config.share.ttl_hours = MAX_CONFIG_HOURS;
        assert!(config.validate().is_ok());
        config.share.ttl_hours = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.worker.orphan_grace_hours = MAX_CONFIG_HOURS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hour_conversions_saturate() {
        let share = ShareConfig {
            ttl_hours: u64::MAX,
            ..ShareConfig::default()
        };
        assert_eq!(share.ttl_seconds(), u64::MAX);
        assert_eq!(share.ttl(), chrono::Duration::MAX);

        let worker = WorkerConfig {
            orphan_grace_hours: 48,
            ..WorkerConfig::default()
        };
        assert_eq!(worker.orphan_grace(), chrono::Duration::hours(48));
    }
}
