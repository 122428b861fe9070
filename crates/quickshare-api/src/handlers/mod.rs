//! HTTP request handlers.

pub mod download;
pub mod health;
pub mod pages;
pub mod share;
