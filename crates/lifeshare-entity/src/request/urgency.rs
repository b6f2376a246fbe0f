//! Urgency tier and patient gender enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How soon the recipient needs blood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "urgency_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Elective.
    Low,
    /// Default tier.
    #[default]
    Moderate,
    /// Needed soon.
    High,
    /// Needed immediately.
    Critical,
    /// Legacy client value; rewritten to `Critical` when a match is committed.
    Urgent,
}

impl Urgency {
    /// Collapse the legacy `urgent` tier into `critical`.
    pub fn normalized(self) -> Self {
        match self {
            Self::Urgent => Self::Critical,
            other => other,
        }
    }

    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            "urgent" => Ok(Self::Urgent),
            _ => Err(lifeshare_core::AppError::validation(format!(
                "Invalid urgency level: '{s}'. Expected one of: low, moderate, high, critical"
            ))),
        }
    }
}

/// Patient gender as recorded on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "patient_gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PatientGender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}
