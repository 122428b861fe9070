//! Share creation, retrieval, and deletion handlers.

use std::io;

use axum::Json;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use futures::TryStreamExt;
use tracing::debug;
use validator::Validate;

use quickshare_core::error::AppError;
use quickshare_core::traits::storage::ByteStream;
use quickshare_service::{FileUpload, StagedFile, TextSubmission};

use crate::dto::request::{ShareIdQuery, ShareTextRequest, UploadForm};
use crate::dto::response::{CreateShareResponse, DeleteShareResponse, ShareViewResponse};
use crate::error::ApiError;
use crate::extractors::{SharePassword, parse_share_id};
use crate::state::AppState;

/// POST /api/share/text
pub async fn create_text_share(
    State(state): State<AppState>,
    payload: Result<Json<ShareTextRequest>, JsonRejection>,
) -> Result<Json<CreateShareResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let created = state
        .share_service
        .create_text(TextSubmission {
            text: req.text_content,
            rich_text: req.is_rich_text,
            password: req.password,
        })
        .await?;

    Ok(Json(created.into()))
}

fn field_stream(field: Field<'_>) -> ByteStream<'_> {
    Box::pin(field.map_err(|e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            io::Error::new(io::ErrorKind::FileTooLarge, e.body_text())
        } else {
            io::Error::other(e.body_text())
        }
    }))
}

async fn read_form(
    state: &AppState,
    multipart: &mut Multipart,
    form: &mut UploadForm,
    staged: &mut Option<StagedFile>,
) -> Result<(), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                if staged.is_some() {
                    return Err(AppError::validation("Only one file may be uploaded per share").into());
                }
                let upload = FileUpload {
                    file_name: field.file_name().map(str::to_string),
                    content_type: field.content_type().map(str::to_string),
                    body: field_stream(field),
                };
                *staged = Some(state.share_service.stage_file(upload).await?);
            }
            "isRichText" | "richText" => {
                let value = field.text().await?;
                form.is_rich_text = value.trim().eq_ignore_ascii_case("true");
            }
            "password" => {
                let value = field.text().await?;
                form.password = Some(value).filter(|p| !p.is_empty());
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }
    Ok(())
}

/// POST /api/share/file
pub async fn create_file_share(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreateShareResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut form = UploadForm::default();
    let mut staged = None;

    let read = read_form(&state, &mut multipart, &mut form, &mut staged).await;
    let checked = read.and_then(|()| form.validate().map_err(ApiError::from));

    let staged = match (checked, staged) {
        (Ok(()), Some(staged)) => staged,
        (Ok(()), None) => {
            return Err(AppError::validation("Multipart field 'file' is required").into());
        }
        (Err(e), leftover) => {
            if let Some(leftover) = leftover {
                state.share_service.discard_file(leftover).await;
            }
            return Err(e);
        }
    };

    let created = state
        .share_service
        .commit_file(staged, form.password.as_deref())
        .await?;

    Ok(Json(created.into()))
}

/// GET /api/share?shareId=
pub async fn get_share(
    State(state): State<AppState>,
    query: Result<Query<ShareIdQuery>, QueryRejection>,
) -> Result<Json<ShareViewResponse>, ApiError> {
    let Query(query) = query?;
    let share_id = parse_share_id(&query.share_id)?;
    let record = state.share_service.get(share_id).await?;
    Ok(Json(record.into()))
}

/// GET /api/share/{id}
pub async fn get_share_by_path(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ShareViewResponse>, ApiError> {
    let Path(id) = id?;
    let share_id = parse_share_id(&id)?;
    let record = state.share_service.get(share_id).await?;
    Ok(Json(record.into()))
}

/// DELETE /api/share/{id}
pub async fn delete_share(
    State(state): State<AppState>,
    password: SharePassword,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteShareResponse>, ApiError> {
    let Path(id) = id?;
    let share_id = parse_share_id(&id)?;
    state
        .share_service
        .delete(share_id, password.as_deref())
        .await?;

    Ok(Json(DeleteShareResponse {
        success: true,
        share_id,
    }))
}
