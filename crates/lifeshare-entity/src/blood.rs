//! ABO/Rh blood group enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight ABO/Rh blood groups.
///
/// Matching is exact: a request for `O-` is only offered to `O-` donors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "blood_group")]
pub enum BloodGroup {
    /// A, Rh positive.
    #[serde(rename = "A+")]
    #[sqlx(rename = "A+")]
    APositive,
    /// A, Rh negative.
    #[serde(rename = "A-")]
    #[sqlx(rename = "A-")]
    ANegative,
    /// B, Rh positive.
    #[serde(rename = "B+")]
    #[sqlx(rename = "B+")]
    BPositive,
    /// B, Rh negative.
    #[serde(rename = "B-")]
    #[sqlx(rename = "B-")]
    BNegative,
    /// AB, Rh positive.
    #[serde(rename = "AB+")]
    #[sqlx(rename = "AB+")]
    AbPositive,
    /// AB, Rh negative.
    #[serde(rename = "AB-")]
    #[sqlx(rename = "AB-")]
    AbNegative,
    /// O, Rh positive.
    #[serde(rename = "O+")]
    #[sqlx(rename = "O+")]
    OPositive,
    /// O, Rh negative.
    #[serde(rename = "O-")]
    #[sqlx(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// Every blood group, in display order.
    pub const ALL: [BloodGroup; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Return the conventional notation, e.g. `"AB-"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == normalized)
            .ok_or_else(|| {
                lifeshare_core::AppError::validation(format!(
                    "Invalid blood group: '{s}'. Expected one of: A+, A-, B+, B-, AB+, AB-, O+, O-"
                ))
            })
    }
}
