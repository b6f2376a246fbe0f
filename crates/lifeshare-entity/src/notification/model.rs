//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{AppointmentId, InventoryUnitId, NotificationId, RequestId, UserId};

use super::kind::NotificationKind;

/// A message addressed to one user. Only the read flag ever changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Addressee.
    pub user_id: UserId,
    /// Type tag.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: Option<String>,
    /// Body text.
    pub message: Option<String>,
    /// Hospital the notification concerns.
    pub hospital_name: Option<String>,
    /// Appointment slot the notification concerns.
    pub appointment_time: Option<String>,
    /// Patient the notification concerns.
    pub patient_name: Option<String>,
    /// Originating request.
    pub request_id: Option<RequestId>,
    /// Originating appointment.
    pub appointment_id: Option<AppointmentId>,
    /// Inventory row the notification concerns.
    pub inventory_unit_id: Option<InventoryUnitId>,
    /// Whether the addressee has read it.
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: Option<String>,
    pub hospital_name: Option<String>,
    pub appointment_time: Option<String>,
    pub patient_name: Option<String>,
    pub request_id: Option<RequestId>,
    pub appointment_id: Option<AppointmentId>,
    pub inventory_unit_id: Option<InventoryUnitId>,
}

impl NewNotification {
    /// Start a notification with a title and message.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: Some(title.into()),
            message: Some(message.into()),
            hospital_name: None,
            appointment_time: None,
            patient_name: None,
            request_id: None,
            appointment_id: None,
            inventory_unit_id: None,
        }
    }

    pub fn hospital(mut self, name: impl Into<String>) -> Self {
        self.hospital_name = Some(name.into());
        self
    }

    pub fn appointment_time(mut self, time: Option<String>) -> Self {
        self.appointment_time = time;
        self
    }

    pub fn patient(mut self, name: Option<String>) -> Self {
        self.patient_name = name;
        self
    }

    pub fn request(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn appointment(mut self, id: AppointmentId) -> Self {
        self.appointment_id = Some(id);
        self
    }

    pub fn inventory_unit(mut self, id: InventoryUnitId) -> Self {
        self.inventory_unit_id = Some(id);
        self
    }
}
