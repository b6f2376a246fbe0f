//! Donation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{AppointmentId, DonationId, HospitalId, RequestId, UserId};

use crate::blood::BloodGroup;

/// An immutable record of blood given. Appended, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Donation {
    /// Unique donation identifier.
    pub id: DonationId,
    /// The donor.
    pub donor_id: UserId,
    /// Blood group credited.
    pub blood_group: BloodGroup,
    /// Units credited to inventory.
    pub units: i32,
    /// Hospital credited.
    pub hospital_id: HospitalId,
    /// Hospital name at the time of donation.
    pub hospital_name: String,
    /// Appointment that produced the donation, if any.
    pub appointment_id: Option<AppointmentId>,
    /// Request fulfilled by the donation, if any.
    pub request_id: Option<RequestId>,
    /// When the blood was given.
    pub donation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Data required to append a donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDonation {
    pub donor_id: UserId,
    pub blood_group: BloodGroup,
    pub units: i32,
    pub hospital_id: HospitalId,
    pub hospital_name: String,
    pub appointment_id: Option<AppointmentId>,
    pub request_id: Option<RequestId>,
    pub donation_date: DateTime<Utc>,
}
