//! Donor reminder sweep.
//!
//! A donor is due when their last donation is at least the donation interval
//! ago and they were never reminded, or not within the cooldown. A reminder
//! is stamped only when the email went out, so failed donors are picked up
//! again on the next run.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use lifeshare_core::config::LifecycleConfig;
use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{MailMessage, MailTemplate};
use lifeshare_database::store::UserStore;
use lifeshare_entity::user::User;
use lifeshare_mail::DonationReminderPayload;

use crate::notification::NotificationDispatcher;

/// Outcome of one reminder sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub total_eligible: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Emails donors who are eligible to give blood again.
#[derive(Debug, Clone)]
pub struct ReminderService {
    users: Arc<dyn UserStore>,
    dispatcher: NotificationDispatcher,
    donation_interval: Duration,
    reminder_cooldown: Duration,
}

impl ReminderService {
    /// Creates a new reminder service.
    pub fn new(
        users: Arc<dyn UserStore>,
        dispatcher: NotificationDispatcher,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            users,
            dispatcher,
            donation_interval: Duration::days(config.donation_interval_days),
            reminder_cooldown: Duration::days(config.reminder_cooldown_days),
        }
    }

    /// Find every due donor, email them and stamp the ones that got through.
    pub async fn check_and_remind(&self) -> AppResult<ReminderReport> {
        let now = Utc::now();
        let candidates = self
            .users
            .find_reminder_candidates(now - self.donation_interval, now - self.reminder_cooldown)
            .await?;
        let due: Vec<(User, DateTime<Utc>)> = candidates
            .into_iter()
            .filter(|user| {
                user.is_reminder_eligible(now, self.donation_interval, self.reminder_cooldown)
            })
            .filter_map(|user| user.last_donation_date.map(|donated| (user, donated)))
            .collect();

        if due.is_empty() {
            info!("No donors due for a reminder");
            return Ok(ReminderReport::default());
        }

        let mut messages = Vec::with_capacity(due.len());
        for (donor, last_donation_date) in &due {
            let payload = serde_json::to_value(DonationReminderPayload {
                blood_group: donor.blood_group.map(|g| g.to_string()),
                last_donation_date: *last_donation_date,
                days_since_last_donation: (now - *last_donation_date).num_days(),
            })?;
            messages.push(MailMessage::new(
                donor.email.clone(),
                donor.display_name(),
                MailTemplate::DonationReminder,
                payload,
            ));
        }

        let sent = self.dispatcher.fan_out(messages).await;
        let mut report = ReminderReport {
            total_eligible: due.len(),
            ..ReminderReport::default()
        };
        for ((donor, _), outcome) in due.iter().zip(&sent.outcomes) {
            if !outcome.is_delivered() {
                report.failed += 1;
                continue;
            }
            match self.users.mark_reminder_sent(donor.id, now).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(donor_id = %donor.id, error = %e, "Failed to stamp reminder");
                    report.failed += 1;
                }
            }
        }

        info!(
            eligible = report.total_eligible,
            sent = report.sent,
            failed = report.failed,
            "Donor reminder sweep finished"
        );
        Ok(report)
    }
}
