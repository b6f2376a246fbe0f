//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Settings for the notification dispatcher and donor matching fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Upper bound on concurrently running email sends.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_sends: usize,
    /// Delay inserted between consecutive dispatches, in milliseconds.
    #[serde(default = "default_send_delay")]
    pub send_delay_ms: u64,
    /// Whether creating a request fans out to matching donors.
    #[serde(default = "default_true")]
    pub notify_donors_on_create: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sends: default_max_concurrent(),
            send_delay_ms: default_send_delay(),
            notify_donors_on_create: default_true(),
        }
    }
}

fn default_max_concurrent() -> usize {
    8
}

fn default_send_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}
