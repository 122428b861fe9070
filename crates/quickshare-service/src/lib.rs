//! # quickshare-service
//!
//! Business logic for QuickShare. [`ShareService`] owns the whole share
//! lifecycle and is the only thing the HTTP layer and the background worker
//! talk to.
//!
//! Services follow constructor injection: the store, blob storage and clock
//! are handed in as `Arc` references.

pub mod password;
pub mod share;

pub use password::PasswordHasher;
pub use share::{
    CleanupReport, CreatedShare, DownloadHandle, FileUpload, IdAllocator, ShareService,
    StagedFile, TextSubmission,
};
