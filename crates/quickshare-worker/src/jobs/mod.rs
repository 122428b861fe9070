//! Built-in job handler implementations.

pub mod cleanup;
pub mod snapshot;

pub use cleanup::{SHARE_CLEANUP, ShareCleanupHandler};
pub use snapshot::{SNAPSHOT_FLUSH, SnapshotFlushHandler};
