//! A unit of background work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Job type of the donor reminder sweep.
pub const DONOR_REMINDER: &str = "donor_reminder";
/// Job type of the inventory expiry sweep.
pub const EXPIRY_REMINDER: &str = "expiry_reminder";

/// Attempts granted to scheduled runs. Both sweeps are safe to re-run.
const SCHEDULED_MAX_ATTEMPTS: u32 = 3;

/// What started a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSource {
    Schedule,
    Manual,
}

/// A job handed to the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub job_type: String,
    pub payload: Value,
    pub source: JobSource,
    /// Attempts made so far.
    pub attempt: u32,
    pub max_attempts: u32,
    pub requested_at: DateTime<Utc>,
}

impl Job {
    /// A job fired by the cron scheduler.
    pub fn scheduled(job_type: impl Into<String>, payload: Value) -> Self {
        Self::build(job_type.into(), payload, JobSource::Schedule, SCHEDULED_MAX_ATTEMPTS)
    }

    /// A job fired by an operator. Runs once; the operator can re-trigger.
    pub fn manual(job_type: impl Into<String>, payload: Value) -> Self {
        Self::build(job_type.into(), payload, JobSource::Manual, 1)
    }

    fn build(job_type: String, payload: Value, source: JobSource, max_attempts: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_type,
            payload,
            source,
            attempt: 0,
            max_attempts,
            requested_at: Utc::now(),
        }
    }

    /// A string field of the payload.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}
