//! Notification type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::InventoryKind;

/// Type tag of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Recipient: a donor accepted the request directly.
    DonorAccepted,
    /// Donor: their direct accept went through.
    RequestAccepted,
    /// Recipient: a donor response was accepted.
    ResponseAccepted,
    /// Recipient: the request was fulfilled.
    DonationCompleted,
    /// Staff: a donation they verified was recorded.
    DonationVerified,
    /// Staff: a no-show they recorded.
    AppointmentMissed,
    /// Attendee: upcoming appointment.
    AppointmentReminder,
    /// Supervisor: manual stock correction applied.
    StockAdjusted,
    /// Staff: blood unit close to expiry.
    BloodExpiryReminder,
    /// Staff: plasma unit close to expiry.
    PlasmaExpiryReminder,
    /// Recipient: a donor responded to the request.
    DonorResponded,
}

impl NotificationKind {
    /// Expiry reminder tag for an inventory kind.
    pub fn expiry_reminder_for(kind: InventoryKind) -> Self {
        match kind {
            InventoryKind::Blood => Self::BloodExpiryReminder,
            InventoryKind::Plasma => Self::PlasmaExpiryReminder,
        }
    }

    /// Return the tag as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonorAccepted => "donor_accepted",
            Self::RequestAccepted => "request_accepted",
            Self::ResponseAccepted => "response_accepted",
            Self::DonationCompleted => "donation_completed",
            Self::DonationVerified => "donation_verified",
            Self::AppointmentMissed => "appointment_missed",
            Self::AppointmentReminder => "appointment_reminder",
            Self::StockAdjusted => "stock_adjusted",
            Self::BloodExpiryReminder => "blood_expiry_reminder",
            Self::PlasmaExpiryReminder => "plasma_expiry_reminder",
            Self::DonorResponded => "donor_responded",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
