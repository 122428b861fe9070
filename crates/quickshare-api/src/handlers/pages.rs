//! Static front-end pages.

use std::path::PathBuf;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::state::AppState;

/// GET /view.html and GET /view/{id}
///
/// Both serve the same page; it reads the share code from the URL itself.
pub async fn view_page(State(state): State<AppState>) -> Response {
    let Some(dir) = state.config.server.static_dir.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let path = PathBuf::from(dir).join("view.html");
    match tokio::fs::read(&path).await {
        Ok(html) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read view page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
