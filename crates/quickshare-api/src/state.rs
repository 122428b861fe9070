//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use quickshare_core::config::AppConfig;
use quickshare_service::ShareService;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Share lifecycle service.
    pub share_service: Arc<ShareService>,
    /// When the server started, for the health probe.
    pub started_at: Instant,
}

impl AppState {
    /// Build state around a share service.
    pub fn new(config: Arc<AppConfig>, share_service: Arc<ShareService>) -> Self {
        Self {
            config,
            share_service,
            started_at: Instant::now(),
        }
    }
}
