//! # quickshare-core
//!
//! Core crate for QuickShare. Contains the storage and clock traits,
//! configuration schemas, the [`ShareId`](types::ShareId) type, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other QuickShare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
