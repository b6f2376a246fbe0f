//! Donor response / acknowledgement status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a donor response, also used for the request's donor-side and
/// recipient-side acknowledgement flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "response_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Accepted.
    Accepted,
    /// Declined.
    Declined,
}

impl ResponseStatus {
    /// Parse a decision value; only `accepted` and `declined` are valid targets.
    pub fn parse_decision(s: &str) -> Result<Self, lifeshare_core::AppError> {
        match s.parse::<Self>()? {
            Self::Pending => Err(lifeshare_core::AppError::validation(
                "Invalid response status: expected 'accepted' or 'declined'",
            )),
            decision => Ok(decision),
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: ResponseStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted | Self::Declined)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseStatus {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(lifeshare_core::AppError::validation(format!(
                "Invalid response status: '{s}'"
            ))),
        }
    }
}
