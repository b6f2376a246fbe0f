//! Manual triggers for operators.

use serde_json::{Value, json};

use lifeshare_entity::inventory::InventoryKind;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::job::{DONOR_REMINDER, EXPIRY_REMINDER, Job};

/// A sweep an operator can start by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    DonorReminders,
    /// One kind of stock, or both when `None`.
    Expiry(Option<InventoryKind>),
}

impl Trigger {
    /// The job this trigger runs.
    pub fn job(self) -> Job {
        match self {
            Self::DonorReminders => Job::manual(DONOR_REMINDER, Value::Null),
            Self::Expiry(None) => Job::manual(EXPIRY_REMINDER, Value::Null),
            Self::Expiry(Some(kind)) => {
                Job::manual(EXPIRY_REMINDER, json!({ "kind": kind.as_str() }))
            }
        }
    }
}

impl JobExecutor {
    /// Run a manual trigger now and return the sweep report.
    pub async fn trigger(&self, trigger: Trigger) -> Result<Value, JobExecutionError> {
        Ok(self.run(trigger.job()).await?.unwrap_or(Value::Null))
    }
}
