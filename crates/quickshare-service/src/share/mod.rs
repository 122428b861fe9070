//! Share lifecycle.

pub mod allocator;
pub mod service;
pub mod submission;

pub use allocator::IdAllocator;
pub use service::{CleanupReport, DownloadHandle, ShareService};
pub use submission::{CreatedShare, FileUpload, StagedFile, TextSubmission};
