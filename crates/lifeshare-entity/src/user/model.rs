//! User entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{HospitalId, UserId};

use crate::blood::BloodGroup;

use super::role::{StaffRole, UserRole};

/// A platform account as seen by the lifecycle core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Account role.
    pub role: UserRole,
    /// Display name.
    pub full_name: String,
    /// Contact email, used for outbound messages.
    pub email: String,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// City of residence.
    pub city: Option<String>,
    /// State of residence.
    pub state: Option<String>,
    /// Blood group (donors).
    pub blood_group: Option<BloodGroup>,
    /// Hospital affiliation (staff and hospital accounts).
    pub hospital_id: Option<HospitalId>,
    /// Staff position (hospital staff).
    pub staff_role: Option<StaffRole>,
    /// When the donor last gave blood.
    pub last_donation_date: Option<DateTime<Utc>>,
    /// When the donor last received a re-engagement reminder.
    pub last_reminder_sent: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with; falls back to the email address.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }

    /// Whether the user is a donor due for a "come donate again" reminder.
    ///
    /// Donors who never donated are not eligible.
    pub fn is_reminder_eligible(
        &self,
        now: DateTime<Utc>,
        donation_interval: Duration,
        reminder_cooldown: Duration,
    ) -> bool {
        self.role == UserRole::Donor
            && self
                .last_donation_date
                .is_some_and(|donated| donated <= now - donation_interval)
            && self
                .last_reminder_sent
                .is_none_or(|sent| sent <= now - reminder_cooldown)
    }
}

/// Data required to create a new user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Account role.
    pub role: UserRole,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// City of residence.
    pub city: Option<String>,
    /// State of residence.
    pub state: Option<String>,
    /// Blood group.
    pub blood_group: Option<BloodGroup>,
    /// Hospital affiliation.
    pub hospital_id: Option<HospitalId>,
    /// Staff position.
    pub staff_role: Option<StaffRole>,
    /// Last donation, when importing an existing donor.
    pub last_donation_date: Option<DateTime<Utc>>,
    /// Last reminder, when importing an existing donor.
    pub last_reminder_sent: Option<DateTime<Utc>>,
}

impl CreateUser {
    /// Minimal user with the given role; optional fields are unset.
    pub fn new(role: UserRole, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role,
            full_name: full_name.into(),
            email: email.into(),
            phone_number: None,
            city: None,
            state: None,
            blood_group: None,
            hospital_id: None,
            staff_role: None,
            last_donation_date: None,
            last_reminder_sent: None,
        }
    }
}
