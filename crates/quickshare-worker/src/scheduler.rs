//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use quickshare_core::config::WorkerConfig;
use quickshare_core::error::AppError;

use crate::executor::JobExecutor;
use crate::jobs::{SHARE_CLEANUP, SNAPSHOT_FLUSH};

/// Cron-based scheduler that runs executor jobs on a schedule
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Executor the scheduled jobs dispatch through
    executor: Arc<JobExecutor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("executor", &self.executor)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(executor: Arc<JobExecutor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            executor,
        })
    }

    /// Register the cleanup and snapshot jobs from the worker config.
    ///
    /// A job whose handler is not registered with the executor is skipped.
    pub async fn register_default_tasks(&self, config: &WorkerConfig) -> Result<(), AppError> {
        for (job_type, schedule) in [
            (SHARE_CLEANUP, config.cleanup_schedule.as_str()),
            (SNAPSHOT_FLUSH, config.snapshot_schedule.as_str()),
        ] {
            if !self.executor.has_handler(job_type) {
                tracing::debug!(job_type, "No handler registered, not scheduling");
                continue;
            }
            self.register(job_type, schedule).await?;
        }

        tracing::info!(
            handlers = ?self.executor.registered_types(),
            "All scheduled tasks registered"
        );
        Ok(())
    }

    /// Run `job_type` through the executor on the given cron schedule
    pub async fn register(&self, job_type: &str, schedule: &str) -> Result<(), AppError> {
        let executor = Arc::clone(&self.executor);
        let name = job_type.to_string();
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let name = name.clone();
            Box::pin(async move {
                // Failures are logged by the executor; the next tick retries.
                let _ = executor.execute(&name).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid schedule '{schedule}' for job '{job_type}': {e}"
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add job '{job_type}': {e}")))?;

        tracing::info!(job_type, schedule, "Scheduled job");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
