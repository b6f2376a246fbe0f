//! Hospital entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::HospitalId;

/// A hospital that hosts donations and keeps inventory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hospital {
    /// Unique hospital identifier.
    pub id: HospitalId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Whether an administrator verified the hospital.
    pub verified: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Hospital {
    /// A hospital can be verified only with a name and a contact email.
    pub fn has_contact_details(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Data required to register a hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHospital {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Initial verification state.
    pub verified: bool,
}

impl CreateHospital {
    /// Verified hospital with the given name and email.
    pub fn verified(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            city: None,
            pincode: None,
            address: None,
            verified: true,
        }
    }
}
