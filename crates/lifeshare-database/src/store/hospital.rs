//! Hospital persistence.

use async_trait::async_trait;

use lifeshare_core::result::AppResult;
use lifeshare_core::types::HospitalId;
use lifeshare_entity::hospital::{CreateHospital, Hospital};

/// Persistence operations on hospitals.
#[async_trait]
pub trait HospitalStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a hospital.
    async fn create(&self, input: &CreateHospital) -> AppResult<Hospital>;

    /// Find a hospital by primary key.
    async fn find_by_id(&self, id: HospitalId) -> AppResult<Option<Hospital>>;

    /// All hospitals ordered by name.
    async fn find_all(&self) -> AppResult<Vec<Hospital>>;

    /// Verified hospitals ordered by name.
    async fn find_verified(&self) -> AppResult<Vec<Hospital>>;

    /// Set the verification flag. `None` when the hospital does not exist.
    async fn set_verified(&self, id: HospitalId, verified: bool) -> AppResult<Option<Hospital>>;

    /// Delete a hospital. Returns `false` when it does not exist.
    ///
    /// Fails with a conflict while users, requests, appointments, donations
    /// or stock still reference it.
    async fn delete(&self, id: HospitalId) -> AppResult<bool>;
}

/// Message for a delete blocked by referencing rows.
pub const IN_USE_MESSAGE: &str = "Hospital is still referenced and cannot be deleted";
