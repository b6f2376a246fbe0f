//! Lifecycle thresholds and time windows.

use serde::{Deserialize, Serialize};

/// Thresholds used by the inventory ledger, expiry watcher and reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Units strictly below this count are "low stock".
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: i32,
    /// Expiry horizon in hours.
    #[serde(default = "default_expiry_window")]
    pub expiry_window_hours: i64,
    /// Window in which an expiry reminder for the same unit is not repeated.
    #[serde(default = "default_expiry_dedup")]
    pub expiry_dedup_hours: i64,
    /// Days since the last donation before a donor is nudged again.
    #[serde(default = "default_donation_interval")]
    pub donation_interval_days: i64,
    /// Minimum days between two reminders to the same donor.
    #[serde(default = "default_reminder_cooldown")]
    pub reminder_cooldown_days: i64,
    /// Maximum requests in a donor's feed.
    #[serde(default = "default_feed_limit")]
    pub donor_request_feed_limit: i64,
    /// Maximum rows in the completed-matches listing.
    #[serde(default = "default_completed_limit")]
    pub completed_matches_limit: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock(),
            expiry_window_hours: default_expiry_window(),
            expiry_dedup_hours: default_expiry_dedup(),
            donation_interval_days: default_donation_interval(),
            reminder_cooldown_days: default_reminder_cooldown(),
            donor_request_feed_limit: default_feed_limit(),
            completed_matches_limit: default_completed_limit(),
        }
    }
}

fn default_low_stock() -> i32 {
    5
}

fn default_expiry_window() -> i64 {
    48
}

fn default_expiry_dedup() -> i64 {
    24
}

fn default_donation_interval() -> i64 {
    90
}

fn default_reminder_cooldown() -> i64 {
    30
}

fn default_feed_limit() -> i64 {
    10
}

fn default_completed_limit() -> i64 {
    10
}
