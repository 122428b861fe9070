//! # quickshare-store
//!
//! Share metadata storage for QuickShare.
//!
//! - **memory**: the live share map, backed by [dashmap](https://crates.io/crates/dashmap)
//! - **snapshot**: a JSON file the map is flushed to and restored from
//!
//! Every mutation sets a dirty flag so the snapshot is only rewritten when
//! something changed.

pub mod memory;
pub mod snapshot;

pub use memory::{Lookup, ShareStore};
pub use snapshot::SnapshotFile;
