//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, UserId};
use lifeshare_entity::user::{StaffRole, UserRole};

/// Context for the current authenticated request.
///
/// Built from the verified identity token and passed into service methods
/// so every operation knows who is acting and for which hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// Hospital affiliation of staff and hospital accounts.
    pub hospital_id: Option<HospitalId>,
    /// Staff position, for hospital staff.
    pub staff_role: Option<StaffRole>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a user without hospital affiliation.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            hospital_id: None,
            staff_role: None,
            request_time: Utc::now(),
        }
    }

    /// Attach a hospital affiliation.
    pub fn with_hospital(mut self, hospital_id: HospitalId) -> Self {
        self.hospital_id = Some(hospital_id);
        self
    }

    /// Attach a staff position.
    pub fn with_staff_role(mut self, staff_role: StaffRole) -> Self {
        self.staff_role = Some(staff_role);
        self
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail unless the caller has one of `roles`.
    pub fn require_role(&self, roles: &[UserRole]) -> AppResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{}' is not allowed to perform this action",
                self.role
            )))
        }
    }

    /// Fail unless the caller is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        self.require_role(&[UserRole::Admin])
    }

    /// The caller's hospital, for staff and hospital accounts.
    pub fn require_hospital(&self) -> AppResult<HospitalId> {
        if !self.role.is_hospital_side() {
            return Err(AppError::authorization(
                "Access denied. Hospital staff or hospital account required",
            ));
        }
        self.hospital_id
            .ok_or_else(|| AppError::authorization("Account is not affiliated with a hospital"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeshare_core::error::ErrorKind;

    #[test]
    fn test_require_hospital() {
        let hospital = HospitalId::new();
        let staff = RequestContext::new(UserId::new(), UserRole::HospitalStaff).with_hospital(hospital);
        assert_eq!(staff.require_hospital().unwrap(), hospital);

        let unaffiliated = RequestContext::new(UserId::new(), UserRole::Hospital);
        assert!(unaffiliated.require_hospital().is_err());

        let donor = RequestContext::new(UserId::new(), UserRole::Donor).with_hospital(hospital);
        assert_eq!(
            donor.require_hospital().unwrap_err().kind,
            ErrorKind::Authorization
        );
    }

    #[test]
    fn test_require_role() {
        let ctx = RequestContext::new(UserId::new(), UserRole::Recipient);
        assert!(ctx.require_role(&[UserRole::Recipient, UserRole::Admin]).is_ok());
        assert!(ctx.require_admin().is_err());
    }
}
