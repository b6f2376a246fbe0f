//! Appointment status and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a scheduled in-person donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, donor not yet arrived.
    Scheduled,
    /// Donor arrived at the hospital.
    CheckedIn,
    /// Blood collected, not yet recorded as a donation.
    Collected,
    /// Donation recorded. Terminal.
    Donated,
    /// Donor did not show up. Terminal.
    Missed,
    /// Called off. Terminal.
    Cancelled,
}

impl AppointmentStatus {
    const ALL: [AppointmentStatus; 6] = [
        Self::Scheduled,
        Self::CheckedIn,
        Self::Collected,
        Self::Donated,
        Self::Missed,
        Self::Cancelled,
    ];

    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Donated | Self::Missed | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        match self {
            Self::Scheduled => next != Self::Scheduled,
            Self::CheckedIn => matches!(next, Self::Collected | Self::Donated | Self::Cancelled),
            Self::Collected => matches!(next, Self::Donated | Self::Cancelled),
            Self::Donated | Self::Missed | Self::Cancelled => false,
        }
    }

    /// Every status from which `target` may be reached.
    pub fn allowed_sources(target: AppointmentStatus) -> Vec<AppointmentStatus> {
        Self::ALL
            .into_iter()
            .filter(|source| source.can_transition_to(target))
            .collect()
    }

    /// Whether reaching this status stamps the verifying staff and time.
    pub fn requires_verification(&self) -> bool {
        matches!(self, Self::Donated | Self::Missed)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::CheckedIn => "checked_in",
            Self::Collected => "collected",
            Self::Donated => "donated",
            Self::Missed => "missed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                lifeshare_core::AppError::validation(format!(
                    "Invalid appointment status: '{s}'"
                ))
            })
    }
}
