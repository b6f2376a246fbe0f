//! Cron scheduler for the daily sweeps.

use std::sync::Arc;

use serde_json::Value;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, info};

use lifeshare_core::config::SchedulerConfig;
use lifeshare_core::error::AppError;

use crate::executor::JobExecutor;
use crate::job::{DONOR_REMINDER, EXPIRY_REMINDER, Job};

/// Cron-based scheduler for the recurring sweeps
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Executor the fired jobs run on
    executor: Arc<JobExecutor>,
    config: SchedulerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("donor_reminder_cron", &self.config.donor_reminder_cron)
            .field("expiry_reminder_cron", &self.config.expiry_reminder_cron)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(executor: Arc<JobExecutor>, config: SchedulerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            executor,
            config,
        })
    }

    /// Register the donor reminder and expiry sweeps
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register(DONOR_REMINDER, &self.config.donor_reminder_cron)
            .await?;
        self.register(EXPIRY_REMINDER, &self.config.expiry_reminder_cron)
            .await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Run `job_type` on the executor whenever `schedule` fires (UTC).
    async fn register(&self, job_type: &'static str, schedule: &str) -> Result<(), AppError> {
        let executor = Arc::clone(&self.executor);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            Box::pin(async move {
                debug!(job_type, "Scheduled job fired");
                // Failures are logged by the executor; the next firing retries.
                let _ = executor.run(Job::scheduled(job_type, Value::Null)).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid schedule '{schedule}' for {job_type}: {e}"
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {job_type} schedule: {e}")))?;

        info!(job_type, schedule, "Registered scheduled job");
        Ok(())
    }
}
