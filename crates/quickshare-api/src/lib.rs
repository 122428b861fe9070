//! # quickshare-api
//!
//! HTTP API layer for QuickShare built on Axum.
//!
//! Provides the share endpoints, the health probe, optional static page
//! serving, middleware (CORS, logging), extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
