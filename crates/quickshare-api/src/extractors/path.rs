//! Share code parsing for path and query parameters.

use quickshare_core::error::AppError;
use quickshare_core::types::ShareId;

/// Parses a share code from user input, ignoring surrounding whitespace.
pub fn parse_share_id(s: &str) -> Result<ShareId, AppError> {
    s.trim().parse()
}
