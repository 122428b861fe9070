//! Custom Axum extractors.

pub mod password;
pub mod path;

pub use password::{SHARE_PASSWORD_HEADER, SharePassword};
pub use path::parse_share_id;
