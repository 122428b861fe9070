//! Job executor: dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Run the job once, returning a summary of what it did
    async fn execute(&self) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure: the job cannot succeed as configured
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure: the next scheduled run may succeed
    #[error("Transient job failure: {0}")]
    Transient(String),
}

/// Dispatches jobs to the appropriate handler based on job type
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!("Registered job handler for type '{}'", job_type);
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job_type: &str) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{job_type}'"
            ))
        })?;

        let started = Instant::now();
        let result = handler.execute().await;
        let duration_ms = started.elapsed().as_millis();

        match &result {
            Ok(summary) => tracing::debug!(job_type, duration_ms, summary = ?summary, "Job finished"),
            Err(e) => tracing::error!(job_type, duration_ms, error = %e, "Job failed"),
        }
        result
    }

    /// Check if a handler is registered for a job type
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// Get the list of registered job types
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }
}
