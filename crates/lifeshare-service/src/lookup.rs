//! Fetch-or-fail helpers shared by the lifecycle services.

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AppointmentId, RequestId, UserId};
use lifeshare_database::store::{AppointmentStore, HospitalStore, RequestStore, UserStore};
use lifeshare_entity::appointment::Appointment;
use lifeshare_entity::hospital::Hospital;
use lifeshare_entity::request::BloodRequest;
use lifeshare_entity::user::User;

pub(crate) async fn request(store: &dyn RequestStore, id: RequestId) -> AppResult<BloodRequest> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blood request not found"))
}

pub(crate) async fn user(store: &dyn UserStore, id: UserId) -> AppResult<User> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub(crate) async fn appointment(
    store: &dyn AppointmentStore,
    id: AppointmentId,
) -> AppResult<Appointment> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment not found"))
}

/// Resolve the hospital stored on a request. A dangling reference aborts
/// the calling operation before anything is written.
pub(crate) async fn hospital_for(
    store: &dyn HospitalStore,
    request: &BloodRequest,
) -> AppResult<Hospital> {
    store
        .find_by_id(request.hospital_id)
        .await?
        .ok_or_else(|| AppError::unresolved("Hospital not found for the request"))
}
