//! Convenience result type alias for QuickShare.

use crate::error::AppError;

/// A specialized `Result` type for QuickShare operations.
pub type AppResult<T> = Result<T, AppError>;
