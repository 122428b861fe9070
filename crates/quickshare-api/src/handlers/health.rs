//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
///
/// Reports `degraded` when blob storage is unreachable.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (storage_provider, storage_healthy) = state.share_service.storage_health().await;
    let (status, storage) = if storage_healthy {
        ("ok", "available")
    } else {
        ("degraded", "unavailable")
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        active_shares: state.share_service.active_count(),
        storage_provider,
        storage: storage.to_string(),
    })
}
