//! Background sweeps for LifeShare.
//!
//! This crate provides:
//! - A job executor that dispatches jobs to the correct handler and retries
//!   transient failures
//! - Handlers for the donor reminder and inventory expiry sweeps
//! - A cron scheduler that runs both sweeps daily
//! - Manual triggers for the CLI and the admin API

pub mod executor;
pub mod job;
pub mod jobs;
pub mod scheduler;
pub mod trigger;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use job::{Job, JobSource};
pub use scheduler::CronScheduler;
pub use trigger::Trigger;
