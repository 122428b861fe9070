//! Background maintenance for QuickShare.
//!
//! This crate provides:
//! - A job executor that dispatches named jobs to their handlers
//! - A cron scheduler that triggers jobs on configured schedules
//! - Built-in jobs for expiry cleanup and snapshot flushing

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use jobs::{ShareCleanupHandler, SnapshotFlushHandler};
pub use scheduler::CronScheduler;
