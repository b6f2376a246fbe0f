//! Job executor: dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use lifeshare_core::error::{AppError, ErrorKind};

use crate::job::Job;

/// Pause before the first retry; later retries wait proportionally longer.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the job with the given payload
    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, not retried
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, retried with backoff
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Classify a service error: store and provider outages are worth a retry.
    pub fn from_service(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Database | ErrorKind::ExternalService => Self::Transient(err.to_string()),
            ErrorKind::Validation | ErrorKind::Configuration => Self::Permanent(err.to_string()),
            _ => Self::Internal(err),
        }
    }
}

/// Dispatches jobs to the appropriate handler based on job_type
#[derive(Debug)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
    retry_delay: Duration,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the base retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute one attempt of a job by dispatching to the correct handler
    pub async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;

        info!(
            job_id = %job.id,
            job_type = %job.job_type,
            attempt = job.attempt,
            max_attempts = job.max_attempts,
            "Executing job"
        );

        handler.execute(job).await
    }

    /// Run a job to completion, retrying transient failures while attempts remain.
    pub async fn run(&self, mut job: Job) -> Result<Option<Value>, JobExecutionError> {
        loop {
            job.attempt += 1;
            match self.execute(&job).await {
                Ok(result) => {
                    info!(job_id = %job.id, job_type = %job.job_type, "Job completed");
                    return Ok(result);
                }
                Err(JobExecutionError::Transient(msg)) if job.attempt < job.max_attempts => {
                    warn!(
                        job_id = %job.id,
                        job_type = %job.job_type,
                        attempt = job.attempt,
                        error = %msg,
                        "Job failed (transient), retrying"
                    );
                    tokio::time::sleep(self.retry_delay * job.attempt).await;
                }
                Err(e) => {
                    error!(
                        job_id = %job.id,
                        job_type = %job.job_type,
                        attempt = job.attempt,
                        error = %e,
                        "Job failed"
                    );
                    return Err(e);
                }
            }
        }
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

impl Default for JobExecutor {
    fn default() -> Self {
        Self::new()
    }
}
