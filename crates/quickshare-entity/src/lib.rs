//! # quickshare-entity
//!
//! Domain entity models for QuickShare. A [`ShareRecord`](share::ShareRecord)
//! is the single persisted entity; everything else here is a value object
//! derived from it.

pub mod content;
pub mod share;
