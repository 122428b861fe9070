//! Route definitions for the QuickShare HTTP API.
//!
//! Share routes are mounted under `/api`. When a static directory is
//! configured, the view pages and every other unmatched path are served
//! from it.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room left in the request body limit for multipart framing and form fields.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .share
        .max_file_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let api_routes = Router::new().merge(share_routes()).merge(health_routes());

    let mut router = Router::new().nest("/api", api_routes);

    if let Some(dir) = state.config.server.static_dir.clone() {
        router = router
            .route("/view.html", get(handlers::pages::view_page))
            .route("/view/{id}", get(handlers::pages::view_page))
            .fallback_service(ServeDir::new(dir));
    }

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Share lifecycle endpoints.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share", get(handlers::share::get_share))
        .route("/share/text", post(handlers::share::create_text_share))
        .route("/share/file", post(handlers::share::create_file_share))
        .route("/share/download", get(handlers::download::download_share))
        .route(
            "/share/{id}",
            get(handlers::share::get_share_by_path).delete(handlers::share::delete_share),
        )
}

/// Health probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
