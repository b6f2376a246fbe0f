//! Donor and recipient appointment handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use lifeshare_core::types::{AppointmentId, Outcome};
use lifeshare_entity::appointment::Appointment;
use lifeshare_service::lifecycle::AppointmentUpdate;

use crate::dto::request::{AppointmentStatusBody, BookAppointmentBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/appointments
pub async fn book_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<BookAppointmentBody>,
) -> ApiResult<Json<ApiResponse<Outcome<Appointment>>>> {
    body.validate()?;
    let outcome = state.services.appointments.book(&auth, body.into()).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/appointments/mine
pub async fn my_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Appointment>>>> {
    let appointments = state.services.appointments.list_mine(&auth).await?;
    Ok(Json(ApiResponse::ok(appointments)))
}

/// POST /api/appointments/{id}/confirm
pub async fn confirm_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Outcome<Appointment>>>> {
    let id: AppointmentId = parse_id(&id)?;
    let outcome = state.services.appointments.confirm(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// PATCH /api/appointments/{id}
pub async fn update_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<AppointmentStatusBody>,
) -> ApiResult<Json<ApiResponse<Outcome<AppointmentUpdate>>>> {
    body.validate()?;
    let id: AppointmentId = parse_id(&id)?;
    let status = body.parsed_status()?;
    let outcome = state
        .services
        .appointments
        .attendee_update(&auth, id, status)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
