//! Appointment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{AppointmentId, HospitalId, RequestId, UserId};

use super::status::AppointmentStatus;

/// A scheduled in-person donation.
///
/// `verified_by`, `verified_hospital_id` and `verified_at` are written together
/// and only by staff-driven moves to `donated` or `missed`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: AppointmentId,
    /// The donor attending.
    pub donor_id: UserId,
    /// The recipient, absent for general donations.
    pub recipient_id: Option<UserId>,
    /// The request served, absent for general donations.
    pub request_id: Option<RequestId>,
    /// Date of the appointment.
    pub appointment_date: DateTime<Utc>,
    /// Free-text time slot.
    pub appointment_time: Option<String>,
    /// Hospital hosting the appointment.
    pub hospital_id: HospitalId,
    /// Hospital name, copied at creation.
    pub hospital_name: String,
    /// Hospital address, copied at creation.
    pub hospital_address: Option<String>,
    /// Current status.
    pub status: AppointmentStatus,
    /// Attendee confirmed they will attend.
    pub confirmed: bool,
    /// Staff member who verified the outcome.
    pub verified_by: Option<UserId>,
    /// Hospital of the verifying staff member.
    pub verified_hospital_id: Option<HospitalId>,
    /// When the outcome was verified.
    pub verified_at: Option<DateTime<Utc>>,
    /// Free-text notes.
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether the user takes part in the appointment as donor or recipient.
    pub fn is_attendee(&self, user_id: UserId) -> bool {
        self.donor_id == user_id || self.recipient_id == Some(user_id)
    }

    /// Hospital to credit on donation: the verifying hospital, else the host.
    pub fn crediting_hospital(&self) -> HospitalId {
        self.verified_hospital_id.unwrap_or(self.hospital_id)
    }
}

/// Staff verification stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub verified_by: UserId,
    pub hospital_id: HospitalId,
    pub verified_at: DateTime<Utc>,
}

/// Data required to create a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub donor_id: UserId,
    pub recipient_id: Option<UserId>,
    pub request_id: Option<RequestId>,
    pub appointment_date: DateTime<Utc>,
    pub appointment_time: Option<String>,
    pub hospital_id: HospitalId,
    pub hospital_name: String,
    pub hospital_address: Option<String>,
    pub notes: Option<String>,
}
