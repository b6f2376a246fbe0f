//! User and staff role enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account roles supplied by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Gives blood.
    Donor,
    /// Needs blood and raises requests.
    Recipient,
    /// Works at a hospital; verifies appointments.
    HospitalStaff,
    /// Organization account of a hospital.
    Hospital,
    /// Platform operator.
    Admin,
}

impl UserRole {
    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Recipient => "recipient",
            Self::HospitalStaff => "hospital_staff",
            Self::Hospital => "hospital",
            Self::Admin => "admin",
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the role acts on behalf of a hospital.
    pub fn is_hospital_side(&self) -> bool {
        matches!(self, Self::HospitalStaff | Self::Hospital)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "donor" => Ok(Self::Donor),
            "recipient" => Ok(Self::Recipient),
            "hospital_staff" => Ok(Self::HospitalStaff),
            "hospital" => Ok(Self::Hospital),
            "admin" => Ok(Self::Admin),
            _ => Err(lifeshare_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: donor, recipient, hospital_staff, hospital, admin"
            ))),
        }
    }
}

/// Position of a hospital staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Nursing staff.
    Nurse,
    /// Physician.
    Doctor,
    /// Lab or blood-bank technician.
    Technician,
    /// Administrative staff.
    Administrator,
    /// Blood-bank supervisor; the only position allowed to correct stock by hand.
    Supervisor,
}

impl StaffRole {
    /// Return the position as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nurse => "nurse",
            Self::Doctor => "doctor",
            Self::Technician => "technician",
            Self::Administrator => "administrator",
            Self::Supervisor => "supervisor",
        }
    }

    /// Whether this position may apply manual inventory adjustments.
    pub fn can_adjust_stock(&self) -> bool {
        matches!(self, Self::Supervisor)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nurse" => Ok(Self::Nurse),
            "doctor" => Ok(Self::Doctor),
            "technician" => Ok(Self::Technician),
            "administrator" => Ok(Self::Administrator),
            "supervisor" => Ok(Self::Supervisor),
            _ => Err(lifeshare_core::AppError::validation(format!(
                "Invalid staff role: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            UserRole::Donor,
            UserRole::Recipient,
            UserRole::HospitalStaff,
            UserRole::Hospital,
            UserRole::Admin,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_only_supervisor_adjusts_stock() {
        assert!(StaffRole::Supervisor.can_adjust_stock());
        assert!(!StaffRole::Nurse.can_adjust_stock());
        assert!(!StaffRole::Administrator.can_adjust_stock());
    }
}
