//! Expiry watcher: remind hospital staff about stock close to expiry.
//!
//! A unit is expiring when its expiry falls in `(now, now + window]` and it
//! still has units. Each unit is announced at most once per de-duplication
//! period, so a sweep that fires twice does not notify twice.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use lifeshare_core::config::LifecycleConfig;
use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{MailMessage, MailTemplate};
use lifeshare_database::store::{HospitalStore, InventoryStore, NotificationStore, UserStore};
use lifeshare_entity::inventory::{InventoryKind, InventoryUnit, StockLevel};
use lifeshare_entity::notification::{NewNotification, NotificationKind};
use lifeshare_mail::ExpiryReminderPayload;

use crate::notification::NotificationDispatcher;

/// Outcome of one sweep over one inventory kind.
#[derive(Debug, Clone, Serialize)]
pub struct ExpiryReport {
    pub kind: InventoryKind,
    /// Units inside the expiry window.
    pub expiring_units: usize,
    /// Units already announced within the de-duplication period.
    pub skipped_duplicates: usize,
    /// In-app notifications written.
    pub reminders_sent: usize,
    pub emails_delivered: usize,
    pub emails_failed: usize,
    /// Expiring units that are also below the low-stock threshold.
    pub low_stock_units: usize,
}

impl ExpiryReport {
    fn empty(kind: InventoryKind) -> Self {
        Self {
            kind,
            expiring_units: 0,
            skipped_duplicates: 0,
            reminders_sent: 0,
            emails_delivered: 0,
            emails_failed: 0,
            low_stock_units: 0,
        }
    }
}

/// Scans inventory for units about to expire.
#[derive(Debug, Clone)]
pub struct ExpiryService {
    inventory: Arc<dyn InventoryStore>,
    users: Arc<dyn UserStore>,
    hospitals: Arc<dyn HospitalStore>,
    notifications: Arc<dyn NotificationStore>,
    dispatcher: NotificationDispatcher,
    window: Duration,
    dedup: Duration,
    low_stock_threshold: i32,
}

impl ExpiryService {
    /// Creates a new expiry watcher.
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        users: Arc<dyn UserStore>,
        hospitals: Arc<dyn HospitalStore>,
        notifications: Arc<dyn NotificationStore>,
        dispatcher: NotificationDispatcher,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            inventory,
            users,
            hospitals,
            notifications,
            dispatcher,
            window: Duration::hours(config.expiry_window_hours),
            dedup: Duration::hours(config.expiry_dedup_hours),
            low_stock_threshold: config.low_stock_threshold,
        }
    }

    /// Sweep one kind of stock.
    pub async fn check_expiry(&self, kind: InventoryKind) -> AppResult<ExpiryReport> {
        let now = Utc::now();
        let units = self
            .inventory
            .find_expiring(kind, now, now + self.window)
            .await?;
        let reminder_kind = NotificationKind::expiry_reminder_for(kind);
        let since = now - self.dedup;

        let mut report = ExpiryReport::empty(kind);
        report.expiring_units = units.len();

        for unit in &units {
            if unit.level(self.low_stock_threshold) == StockLevel::Low {
                report.low_stock_units += 1;
            }
            if self
                .notifications
                .exists_for_unit_since(reminder_kind, unit.id, since)
                .await?
            {
                debug!(unit_id = %unit.id, kind = %kind, "Expiry reminder already sent");
                report.skipped_duplicates += 1;
                continue;
            }
            self.remind_staff(unit, reminder_kind, &mut report).await?;
        }

        info!(
            kind = %kind,
            expiring = report.expiring_units,
            skipped = report.skipped_duplicates,
            reminders = report.reminders_sent,
            emails_delivered = report.emails_delivered,
            emails_failed = report.emails_failed,
            low_stock = report.low_stock_units,
            "Expiry check finished"
        );
        Ok(report)
    }

    /// Sweep blood, then plasma. A failed kind is logged and left out.
    pub async fn check_all(&self) -> Vec<ExpiryReport> {
        let mut reports = Vec::with_capacity(InventoryKind::ALL.len());
        for kind in InventoryKind::ALL {
            match self.check_expiry(kind).await {
                Ok(report) => reports.push(report),
                Err(e) => error!(kind = %kind, error = %e, "Expiry check failed"),
            }
        }
        reports
    }

    async fn remind_staff(
        &self,
        unit: &InventoryUnit,
        reminder_kind: NotificationKind,
        report: &mut ExpiryReport,
    ) -> AppResult<()> {
        let Some(expiry_date) = unit.expiry_date else {
            return Ok(());
        };
        let staff = self.users.find_staff_by_hospital(unit.hospital_id).await?;
        if staff.is_empty() {
            debug!(unit_id = %unit.id, hospital_id = %unit.hospital_id, "No staff to remind");
            return Ok(());
        }
        let hospital_name = self
            .hospitals
            .find_by_id(unit.hospital_id)
            .await?
            .map(|h| h.name)
            .unwrap_or_else(|| unit.hospital_id.to_string());

        let label = unit.kind.label();
        let date = expiry_date.format("%Y-%m-%d");
        let message = match unit.kind {
            InventoryKind::Blood => format!(
                "{} blood unit ({} units) expires on {}. Please use or separate plasma soon.",
                unit.blood_group, unit.units_available, date
            ),
            InventoryKind::Plasma => format!(
                "{} plasma unit ({} units) expires on {}. Please use immediately.",
                unit.blood_group, unit.units_available, date
            ),
        };

        report.reminders_sent += self
            .dispatcher
            .record_all(
                staff
                    .iter()
                    .map(|member| {
                        NewNotification::new(
                            member.id,
                            reminder_kind,
                            format!("{label} Unit Expiring Soon"),
                            message.clone(),
                        )
                        .hospital(hospital_name.clone())
                        .inventory_unit(unit.id)
                    })
                    .collect::<Vec<_>>(),
            )
            .await;

        let payload = serde_json::to_value(ExpiryReminderPayload {
            kind_label: label.to_string(),
            blood_group: unit.blood_group.to_string(),
            units_available: unit.units_available,
            hospital_name,
            expiry_date,
        })?;
        let sent = self
            .dispatcher
            .fan_out(
                staff
                    .iter()
                    .map(|member| {
                        MailMessage::new(
                            member.email.clone(),
                            member.display_name(),
                            MailTemplate::ExpiryReminder,
                            payload.clone(),
                        )
                    })
                    .collect(),
            )
            .await;
        report.emails_delivered += sent.delivered();
        report.emails_failed += sent.failed();
        Ok(())
    }
}
