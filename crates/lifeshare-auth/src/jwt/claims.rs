//! JWT claims issued by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lifeshare_core::types::{HospitalId, UserId};
use lifeshare_entity::user::{StaffRole, UserRole};

/// Claims payload of an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID.
    pub sub: UserId,
    /// Account role at issuance.
    pub role: UserRole,
    /// Hospital affiliation of staff and hospital accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<HospitalId>,
    /// Staff position of hospital staff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_role: Option<StaffRole>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
