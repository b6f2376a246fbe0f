//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use lifeshare_core::error::AppError;
use lifeshare_core::types::{HospitalId, InventoryUnitId, RequestId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::appointment::AppointmentStatus;
use lifeshare_entity::hospital::CreateHospital;
use lifeshare_entity::inventory::{InventoryKind, PlasmaIntake, UpdatePlasma};
use lifeshare_entity::request::{RequestDetails, Urgency};
use lifeshare_service::StockAdjustment;
use lifeshare_service::lifecycle::{BookAppointment, NewBloodRequest};

/// Create blood request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequestBody {
    pub blood_group: BloodGroup,
    #[validate(range(min = 1, message = "units_needed must be at least 1"))]
    pub units_needed: Option<i32>,
    #[serde(default)]
    pub urgency: Urgency,
    pub hospital_id: HospitalId,
    #[serde(default, flatten)]
    pub details: RequestDetails,
}

impl From<CreateRequestBody> for NewBloodRequest {
    fn from(body: CreateRequestBody) -> Self {
        Self {
            blood_group: body.blood_group,
            units_needed: body.units_needed,
            urgency: body.urgency,
            hospital_id: body.hospital_id,
            details: body.details,
        }
    }
}

/// Donor response to a pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponseBody {
    pub request_id: RequestId,
}

/// Recipient decision on a response: `accepted` or `declined`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecideResponseBody {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Book a general donation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookAppointmentBody {
    pub hospital_id: HospitalId,
    pub appointment_date: DateTime<Utc>,
    #[validate(length(max = 50))]
    pub appointment_time: Option<String>,
    pub request_id: Option<RequestId>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<BookAppointmentBody> for BookAppointment {
    fn from(body: BookAppointmentBody) -> Self {
        Self {
            hospital_id: body.hospital_id,
            appointment_date: body.appointment_date,
            appointment_time: body.appointment_time,
            request_id: body.request_id,
            notes: body.notes,
        }
    }
}

/// Appointment status change, with optional staff notes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppointmentStatusBody {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl AppointmentStatusBody {
    /// Parse the requested status.
    pub fn parsed_status(&self) -> Result<AppointmentStatus, AppError> {
        self.status.parse()
    }
}

/// Supervisor stock correction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockAdjustBody {
    pub blood_group: BloodGroup,
    #[validate(range(min = -10000, max = 10000))]
    pub adjustment: i32,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl From<StockAdjustBody> for StockAdjustment {
    fn from(body: StockAdjustBody) -> Self {
        Self {
            blood_group: body.blood_group,
            adjustment: body.adjustment,
            reason: body.reason,
        }
    }
}

/// Register plasma at a hospital.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPlasmaBody {
    pub hospital_id: HospitalId,
    pub blood_group: BloodGroup,
    #[validate(range(min = 1, max = 10000, message = "units must be between 1 and 10000"))]
    pub units: i32,
    pub expiry_date: DateTime<Utc>,
    pub source_unit_id: Option<InventoryUnitId>,
    pub separation_date: Option<DateTime<Utc>>,
}

impl From<RegisterPlasmaBody> for PlasmaIntake {
    fn from(body: RegisterPlasmaBody) -> Self {
        Self {
            hospital_id: body.hospital_id,
            blood_group: body.blood_group,
            units: body.units,
            expiry_date: body.expiry_date,
            source_unit_id: body.source_unit_id,
            separation_date: body.separation_date,
        }
    }
}

/// Correct a plasma row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePlasmaBody {
    #[validate(range(min = 0, max = 10000, message = "units_available must be between 0 and 10000"))]
    pub units_available: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub separation_date: Option<DateTime<Utc>>,
}

impl From<UpdatePlasmaBody> for UpdatePlasma {
    fn from(body: UpdatePlasmaBody) -> Self {
        Self {
            units_available: body.units_available,
            expiry_date: body.expiry_date,
            separation_date: body.separation_date,
        }
    }
}

/// Register a hospital.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHospitalBody {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid contact email is required"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    pub pincode: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl From<CreateHospitalBody> for CreateHospital {
    fn from(body: CreateHospitalBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            phone: body.phone,
            city: body.city,
            pincode: body.pincode,
            address: body.address,
            verified: body.verified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyHospitalBody {
    pub verified: bool,
}

/// `?kind=blood|plasma`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindQuery {
    pub kind: Option<String>,
}

impl KindQuery {
    /// The requested kind, blood when absent.
    pub fn kind_or_blood(&self) -> Result<InventoryKind, AppError> {
        self.kind
            .as_deref()
            .map_or(Ok(InventoryKind::Blood), str::parse)
    }

    /// The requested kind, if any.
    pub fn kind(&self) -> Result<Option<InventoryKind>, AppError> {
        self.kind.as_deref().map(str::parse).transpose()
    }
}
