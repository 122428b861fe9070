//! Core type definitions used across the QuickShare workspace.

pub mod share_id;

pub use share_id::{SHARE_ID_SPACE, ShareId};
