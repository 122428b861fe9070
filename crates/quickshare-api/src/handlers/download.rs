//! File download handler.

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use quickshare_core::error::AppError;

use crate::dto::request::ShareIdQuery;
use crate::error::ApiError;
use crate::extractors::parse_share_id;
use crate::state::AppState;

/// Bytes left unescaped in an RFC 5987 `filename*` value (`attr-char`).
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// GET /api/share/download?shareId=
pub async fn download_share(
    State(state): State<AppState>,
    query: Result<Query<ShareIdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let share_id = parse_share_id(&query.share_id)?;
    let download = state.share_service.open_download(share_id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_LENGTH, download.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&download.file_name),
        )
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .body(Body::from_stream(download.body))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// `attachment` disposition with an ASCII fallback name and a UTF-8
/// `filename*` parameter.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(file_name, ATTR_CHAR)
    )
}
