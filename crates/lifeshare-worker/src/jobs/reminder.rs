//! Donor reminder sweep job.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use lifeshare_service::ReminderService;

use crate::executor::{JobExecutionError, JobHandler};
use crate::job::{DONOR_REMINDER, Job};

/// Emails donors who are due to donate again.
#[derive(Debug)]
pub struct DonorReminderJobHandler {
    reminders: Arc<ReminderService>,
}

impl DonorReminderJobHandler {
    pub fn new(reminders: Arc<ReminderService>) -> Self {
        Self { reminders }
    }
}

#[async_trait]
impl JobHandler for DonorReminderJobHandler {
    fn job_type(&self) -> &str {
        DONOR_REMINDER
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        info!(job_id = %job.id, source = ?job.source, "Running donor reminder sweep");
        let report = self
            .reminders
            .check_and_remind()
            .await
            .map_err(JobExecutionError::from_service)?;
        Ok(Some(serde_json::to_value(report).map_err(|e| {
            JobExecutionError::Permanent(format!("Failed to encode report: {e}"))
        })?))
    }
}
