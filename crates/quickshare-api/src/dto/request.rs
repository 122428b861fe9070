//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/share/text`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareTextRequest {
    /// The text to share.
    #[serde(default)]
    pub text_content: String,
    /// Rich text flag.
    #[serde(default, alias = "richText")]
    pub is_rich_text: bool,
    /// Optional deletion password.
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: Option<String>,
}

/// Non-file fields of `POST /api/share/file`.
#[derive(Debug, Clone, Default, Validate)]
pub struct UploadForm {
    /// Rich text flag (accepted, not stored for files).
    pub is_rich_text: bool,
    /// Optional deletion password.
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: Option<String>,
}

/// `?shareId=` query parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareIdQuery {
    /// The share code as typed by the user.
    pub share_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rich_text_alias() {
        let req: ShareTextRequest =
            serde_json::from_str(r#"{"textContent":"hi","richText":true}"#).unwrap();
        assert!(req.is_rich_text);
        assert!(req.password.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_long_password_rejected() {
        let req = ShareTextRequest {
            text_content: "hi".into(),
            is_rich_text: false,
            password: Some("p".repeat(129)),
        };
        assert!(req.validate().is_err());
    }
}
