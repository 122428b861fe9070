//! # quickshare-storage
//!
//! Blob storage for uploaded share files. Only the local filesystem
//! provider exists today; callers depend on the
//! [`StorageProvider`](quickshare_core::traits::StorageProvider) trait.

pub mod mime;
pub mod providers;

pub use mime::guess_mime;
pub use providers::LocalStorageProvider;
