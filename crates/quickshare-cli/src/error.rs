//! Client-side error taxonomy.

use thiserror::Error;

/// Everything that can go wrong talking to a QuickShare server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The input was rejected before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message reported by the server, or the status reason
        message: String,
    },

    /// A success response could not be understood.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// Reading or writing a local file failed.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// An interactive prompt failed.
    #[error("Input error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl ClientError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<quickshare_core::error::AppError> for ClientError {
    fn from(err: quickshare_core::error::AppError) -> Self {
        Self::Validation(err.message)
    }
}
