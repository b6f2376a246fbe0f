//! Notification dispatcher: in-app records inline, email on a bounded pool.
//!
//! Recording an in-app notification and sending an email are both
//! best-effort. Failures are logged and reported per message but never
//! surface as the failure of the lifecycle operation that triggered them.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use lifeshare_core::config::NotificationsConfig;
use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{DeliveryReceipt, MailMessage, Mailer};
use lifeshare_database::store::NotificationStore;
use lifeshare_entity::notification::{NewNotification, Notification};

/// Result of one outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The provider accepted the message.
    Delivered { to: String, message_id: String },
    /// The send failed; the message is not retried.
    Failed { to: String, reason: String },
}

impl DeliveryOutcome {
    fn from_result(to: &str, result: AppResult<DeliveryReceipt>) -> Self {
        match result {
            Ok(receipt) => Self::Delivered {
                to: to.to_string(),
                message_id: receipt.message_id,
            },
            Err(e) => Self::Failed {
                to: to.to_string(),
                reason: e.message,
            },
        }
    }

    /// Whether the provider accepted the message.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Recipient address.
    pub fn recipient(&self) -> &str {
        match self {
            Self::Delivered { to, .. } | Self::Failed { to, .. } => to,
        }
    }
}

/// Outcomes of a batch, in the order the messages were given.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FanOutReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl FanOutReport {
    /// Messages attempted.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Messages the provider accepted.
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    /// Messages that failed.
    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }
}

/// Creates in-app notifications and sends email for target users.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationStore>,
    mailer: Arc<dyn Mailer>,
    /// Bounds concurrently running sends.
    permits: Arc<Semaphore>,
    /// Pause between consecutive dispatches.
    send_delay: Duration,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        mailer: Arc<dyn Mailer>,
        config: &NotificationsConfig,
    ) -> Self {
        Self {
            notifications,
            mailer,
            permits: Arc::new(Semaphore::new(config.max_concurrent_sends.max(1))),
            send_delay: Duration::from_millis(config.send_delay_ms),
        }
    }

    /// Write one in-app notification. Returns `None` when the write failed.
    pub async fn record(&self, notification: NewNotification) -> Option<Notification> {
        match self.notifications.create(&notification).await {
            Ok(created) => {
                debug!(
                    user_id = %created.user_id,
                    kind = %created.kind,
                    "Notification recorded"
                );
                Some(created)
            }
            Err(e) => {
                warn!(
                    user_id = %notification.user_id,
                    kind = %notification.kind,
                    error = %e,
                    "Failed to record notification"
                );
                None
            }
        }
    }

    /// Write several in-app notifications. Returns how many were written.
    pub async fn record_all(
        &self,
        notifications: impl IntoIterator<Item = NewNotification>,
    ) -> usize {
        let mut recorded = 0;
        for notification in notifications {
            if self.record(notification).await.is_some() {
                recorded += 1;
            }
        }
        recorded
    }

    /// Send every message and wait for the whole batch.
    ///
    /// Sends run concurrently up to the configured bound, with the configured
    /// delay between dispatches. One failed send never affects the others.
    pub async fn fan_out(&self, messages: Vec<MailMessage>) -> FanOutReport {
        let mut pending: Vec<(String, JoinHandle<DeliveryOutcome>)> =
            Vec::with_capacity(messages.len());

        for (index, message) in messages.into_iter().enumerate() {
            if index > 0 && !self.send_delay.is_zero() {
                tokio::time::sleep(self.send_delay).await;
            }
            let to = message.to.clone();
            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(to = %to, error = %e, "Send pool closed");
                    let failed = DeliveryOutcome::Failed {
                        to: to.clone(),
                        reason: "send pool closed".to_string(),
                    };
                    pending.push((to, tokio::spawn(async move { failed })));
                    continue;
                }
            };
            let mailer = Arc::clone(&self.mailer);
            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = mailer.send(&message).await;
                match &result {
                    Ok(receipt) => debug!(
                        to = %message.to,
                        template = %message.template,
                        message_id = %receipt.message_id,
                        "Email sent"
                    ),
                    Err(e) => warn!(
                        to = %message.to,
                        template = %message.template,
                        error = %e,
                        "Email send failed"
                    ),
                }
                DeliveryOutcome::from_result(&message.to, result)
            });
            pending.push((to, handle));
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        for (to, handle) in pending {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(to = %to, error = %e, "Email task aborted");
                    DeliveryOutcome::Failed {
                        to,
                        reason: format!("send task failed: {e}"),
                    }
                }
            };
            outcomes.push(outcome);
        }
        FanOutReport { outcomes }
    }

    /// Start a batch in the background and return at once.
    pub fn fan_out_detached(&self, messages: Vec<MailMessage>) -> JoinHandle<FanOutReport> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.fan_out(messages).await })
    }
}
