//! Blood request status and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a blood request.
///
/// `pending → {accepted, matched, cancelled}`, `accepted|matched →
/// {completed, cancelled}`. `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for a donor.
    Pending,
    /// A donor accepted the request directly.
    Accepted,
    /// The recipient accepted a donor's response.
    Matched,
    /// The donation happened.
    Completed,
    /// Withdrawn before completion.
    Cancelled,
}

impl RequestStatus {
    /// Statuses in which a donor is bound to the request.
    pub const BOUND: [RequestStatus; 2] = [Self::Accepted, Self::Matched];

    /// Statuses from which a request may still be cancelled.
    pub const CANCELLABLE: [RequestStatus; 3] = [Self::Pending, Self::Accepted, Self::Matched];

    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a donor is bound in this status.
    pub fn has_donor(&self) -> bool {
        Self::BOUND.contains(self)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Accepted | Self::Matched | Self::Cancelled) => true,
            (Self::Accepted | Self::Matched, Self::Completed | Self::Cancelled) => true,
            _ => false,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Matched => "matched",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "matched" => Ok(Self::Matched),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(lifeshare_core::AppError::validation(format!(
                "Invalid request status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use RequestStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Matched));
        assert!(Matched.can_transition_to(Completed));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Matched.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Matched));
    }

    #[test]
    fn test_terminal_states_are_final() {
        use RequestStatus::*;
        for next in [Pending, Accepted, Matched, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }
}
