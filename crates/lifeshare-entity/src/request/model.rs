//! Blood request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{HospitalId, RequestId, UserId};

use crate::blood::BloodGroup;
use crate::response::ResponseStatus;

use super::status::RequestStatus;
use super::urgency::{PatientGender, Urgency};

/// A recipient's need for blood at a specific hospital.
///
/// Root of the lifecycle. Responses, appointments and donations hang off it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BloodRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The recipient who raised the request.
    pub recipient_id: UserId,
    /// The donor bound once the request is accepted or matched.
    pub donor_id: Option<UserId>,
    /// Requested blood group.
    pub blood_group: BloodGroup,
    /// Units needed; unset means one unit, applied at match time.
    pub units_needed: Option<i32>,
    /// Urgency tier.
    pub urgency: Urgency,
    /// Hospital where the donation takes place.
    pub hospital_id: HospitalId,
    /// Hospital name, copied at creation.
    pub hospital_name: String,
    /// Hospital address, copied at creation.
    pub hospital_address: Option<String>,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Donor-side acknowledgement.
    pub donor_response: ResponseStatus,
    /// Recipient-side acknowledgement.
    pub recipient_status: ResponseStatus,
    /// Optional descriptive fields.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub details: RequestDetails,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request last changed.
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    /// Units to credit or match against; defaults to one.
    pub fn effective_units(&self) -> i32 {
        self.units_needed.filter(|units| *units > 0).unwrap_or(1)
    }

    /// Whether the given user raised this request.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.recipient_id == user_id
    }

    /// Whether `donor_id` is the donor currently bound to this request.
    pub fn is_bound_to(&self, donor_id: UserId) -> bool {
        self.status.has_donor() && self.donor_id == Some(donor_id)
    }

    /// Whether `donor_id` may book an appointment directed at this request:
    /// it is still open to any donor, or already bound to this one.
    pub fn accepts_booking_from(&self, donor_id: UserId) -> bool {
        self.status == RequestStatus::Pending || self.is_bound_to(donor_id)
    }

    /// Appointment date implied by the request: the required date, else `now`.
    pub fn appointment_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.details.required_date.unwrap_or(now)
    }
}

/// Descriptive fields carried unchanged through the lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RequestDetails {
    /// Reason for the transfusion.
    pub purpose: Option<String>,
    /// Person to contact about the request.
    pub contact_person: Option<String>,
    /// Phone number of the contact person.
    pub contact_number: Option<String>,
    /// Email of the contact person.
    pub contact_email: Option<String>,
    /// Treating doctor.
    pub doctor_name: Option<String>,
    /// Medical condition of the patient.
    pub medical_condition: Option<String>,
    /// Date by which blood is needed.
    pub required_date: Option<DateTime<Utc>>,
    /// Free-text notes.
    pub additional_notes: Option<String>,
    /// Patient name.
    pub patient_name: Option<String>,
    /// Patient age in years.
    pub patient_age: Option<i32>,
    /// Patient gender.
    pub patient_gender: Option<PatientGender>,
    /// Hemoglobin level in g/dL.
    pub hemoglobin_level: Option<f64>,
}

/// Data required to create a new blood request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBloodRequest {
    pub recipient_id: UserId,
    pub blood_group: BloodGroup,
    pub units_needed: Option<i32>,
    pub urgency: Urgency,
    pub hospital_id: HospitalId,
    pub hospital_name: String,
    pub hospital_address: Option<String>,
    pub details: RequestDetails,
}
