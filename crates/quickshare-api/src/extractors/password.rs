//! `SharePassword` extractor: reads the deletion password header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use quickshare_core::error::AppError;

use crate::error::ApiError;

/// Header carrying the password for share deletion.
pub const SHARE_PASSWORD_HEADER: &str = "x-share-password";

/// The password supplied with a request, if any.
///
/// An absent or empty header yields `None`; the service
/// decides what a missing password means.
#[derive(Debug, Clone, Default)]
pub struct SharePassword(pub Option<String>);

impl SharePassword {
    /// The password, if one was sent.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SharePassword {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SHARE_PASSWORD_HEADER) else {
            return Ok(Self(None));
        };
        let password = value
            .to_str()
            .map_err(|_| AppError::validation("X-Share-Password must be visible ASCII"))?;
        Ok(Self(Some(password.to_string()).filter(|p| !p.is_empty())))
    }
}
