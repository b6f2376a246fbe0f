//! Inventory expiry sweep job.
//!
//! The payload may name one kind (`{"kind": "plasma"}`); without it both
//! blood and plasma are swept.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use lifeshare_entity::inventory::InventoryKind;
use lifeshare_service::ExpiryService;

use crate::executor::{JobExecutionError, JobHandler};
use crate::job::{EXPIRY_REMINDER, Job};

/// Reminds hospital staff about stock close to expiry.
#[derive(Debug)]
pub struct ExpiryReminderJobHandler {
    expiry: Arc<ExpiryService>,
}

impl ExpiryReminderJobHandler {
    pub fn new(expiry: Arc<ExpiryService>) -> Self {
        Self { expiry }
    }
}

#[async_trait]
impl JobHandler for ExpiryReminderJobHandler {
    fn job_type(&self) -> &str {
        EXPIRY_REMINDER
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let encode = |e: serde_json::Error| {
            JobExecutionError::Permanent(format!("Failed to encode report: {e}"))
        };
        match job.payload_str("kind") {
            Some(kind) => {
                let kind = kind
                    .parse::<InventoryKind>()
                    .map_err(|e| JobExecutionError::Permanent(e.message))?;
                info!(job_id = %job.id, kind = %kind, "Running expiry sweep");
                let report = self
                    .expiry
                    .check_expiry(kind)
                    .await
                    .map_err(JobExecutionError::from_service)?;
                Ok(Some(serde_json::to_value(report).map_err(encode)?))
            }
            None => {
                info!(job_id = %job.id, "Running expiry sweep for all kinds");
                let reports = self.expiry.check_all().await;
                Ok(Some(serde_json::to_value(reports).map_err(encode)?))
            }
        }
    }
}
