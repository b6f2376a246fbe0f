//! User persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, UserId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::user::{CreateUser, User, UserRole};

/// Persistence operations on user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a user.
    async fn create(&self, input: &CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Donors whose blood group equals `group` exactly.
    async fn find_donors_by_blood_group(&self, group: BloodGroup) -> AppResult<Vec<User>>;

    /// Donors who last donated on or before `donated_before` and were never
    /// reminded or last reminded on or before `reminded_before`.
    async fn find_reminder_candidates(
        &self,
        donated_before: DateTime<Utc>,
        reminded_before: DateTime<Utc>,
    ) -> AppResult<Vec<User>>;

    /// Hospital staff affiliated with a hospital.
    async fn find_staff_by_hospital(&self, hospital_id: HospitalId) -> AppResult<Vec<User>>;

    /// Number of users with `role`, or of all users when `None`.
    async fn count_by_role(&self, role: Option<UserRole>) -> AppResult<i64>;

    /// Stamp `last_reminder_sent`.
    async fn mark_reminder_sent(&self, id: UserId, at: DateTime<Utc>) -> AppResult<()>;
}
