//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use quickshare_core::error::{AppError, ErrorKind};

use crate::dto::response::ErrorResponse;

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self.0.kind {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "SHARE_NOT_FOUND"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
            ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::Internal
            | ErrorKind::Storage
            | ErrorKind::Configuration
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, source = ?self.0.source, "Request failed");
        }

        let body = ErrorResponse {
            success: false,
            error: error_code.to_string(),
            message: self.0.message,
        };

        (status, Json(body)).into_response()
    }
}

fn rejection(status: StatusCode, text: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError(AppError::payload_too_large(text))
    } else {
        ApiError(AppError::validation(text))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        rejection(rej.status(), format!("Invalid JSON body: {}", rej.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rej: QueryRejection) -> Self {
        rejection(rej.status(), format!("Invalid query string: {}", rej.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rej: PathRejection) -> Self {
        rejection(rej.status(), format!("Invalid path: {}", rej.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rej: MultipartRejection) -> Self {
        rejection(rej.status(), format!("Invalid multipart body: {}", rej.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        rejection(err.status(), format!("Multipart error: {}", err.body_text()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errs: validator::ValidationErrors) -> Self {
        ApiError(AppError::validation(errs.to_string()))
    }
}
