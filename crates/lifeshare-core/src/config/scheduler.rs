//! Background sweep schedule configuration.

use serde::{Deserialize, Serialize};

/// Cron schedules for the recurring sweeps (six-field, seconds first, UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler runs inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Schedule of the donor re-engagement sweep.
    #[serde(default = "default_donor_reminder_cron")]
    pub donor_reminder_cron: String,
    /// Schedule of the inventory expiry sweep.
    #[serde(default = "default_expiry_reminder_cron")]
    pub expiry_reminder_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            donor_reminder_cron: default_donor_reminder_cron(),
            expiry_reminder_cron: default_expiry_reminder_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_donor_reminder_cron() -> String {
    "0 0 9 * * *".to_string()
}

fn default_expiry_reminder_cron() -> String {
    "0 0 8 * * *".to_string()
}
