//! Appointment persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AppointmentId, HospitalId, UserId};
use lifeshare_entity::appointment::{
    Appointment, AppointmentStatus, CreateAppointment, Verification,
};

/// Persistence operations on appointments.
///
/// Moves to `donated` go through
/// [`DonationLedgerStore`](super::DonationLedgerStore) so the inventory
/// credit lands in the same transaction.
#[async_trait]
pub trait AppointmentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a `scheduled` appointment.
    async fn create(&self, input: &CreateAppointment) -> AppResult<Appointment>;

    /// Find an appointment by primary key.
    async fn find_by_id(&self, id: AppointmentId) -> AppResult<Option<Appointment>>;

    /// Appointments where the user is donor or recipient, latest date first.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Appointment>>;

    /// Appointments hosted by a hospital, latest date first.
    async fn find_by_hospital(&self, hospital_id: HospitalId) -> AppResult<Vec<Appointment>>;

    /// `scheduled` appointments at a hospital dated on or after `from`, earliest first.
    async fn find_upcoming_by_hospital(
        &self,
        hospital_id: HospitalId,
        from: DateTime<Utc>,
    ) -> AppResult<Vec<Appointment>>;

    /// Set the attendee confirmation flag.
    async fn set_confirmed(&self, id: AppointmentId) -> AppResult<Option<Appointment>>;

    /// Move an appointment to `to` if its status is one of `from`, writing the
    /// verification stamp when given.
    async fn transition(
        &self,
        id: AppointmentId,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
        verification: Option<Verification>,
    ) -> AppResult<Option<Appointment>>;
}
