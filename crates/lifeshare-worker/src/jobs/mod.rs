//! Handlers for the recurring sweeps.

pub mod expiry;
pub mod reminder;

use std::sync::Arc;

use lifeshare_service::Services;

use crate::executor::JobExecutor;

pub use expiry::ExpiryReminderJobHandler;
pub use reminder::DonorReminderJobHandler;

/// An executor with every sweep handler registered.
pub fn default_executor(services: &Services) -> JobExecutor {
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(DonorReminderJobHandler::new(
        services.reminders.clone(),
    )));
    executor.register(Arc::new(ExpiryReminderJobHandler::new(
        services.expiry.clone(),
    )));
    executor
}
