//! Hospital organization handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use lifeshare_core::types::{AppointmentId, Outcome, RequestId};
use lifeshare_entity::appointment::Appointment;
use lifeshare_entity::hospital::Hospital;
use lifeshare_entity::request::BloodRequest;
use lifeshare_service::StockView;
use lifeshare_service::lifecycle::{AppointmentUpdate, CompletedRequest};

use crate::dto::request::{AppointmentStatusBody, KindQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// GET /api/hospitals/verified
pub async fn verified_hospitals(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Hospital>>>> {
    let hospitals = state.services.hospitals.list_verified().await?;
    Ok(Json(ApiResponse::ok(hospitals)))
}

/// GET /api/hospital/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Appointment>>>> {
    let appointments = state.services.appointments.hospital_list(&auth).await?;
    Ok(Json(ApiResponse::ok(appointments)))
}

/// PATCH /api/hospital/appointments/{id}/status
pub async fn update_appointment_status(
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
        .hospital_update_status(&auth, id, status, body.notes)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/hospital/requests/accepted
pub async fn accepted_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BloodRequest>>>> {
    let requests = state.services.completion.accepted_requests(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// POST /api/hospital/requests/{id}/complete
pub async fn complete_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Outcome<CompletedRequest>>>> {
    let id: RequestId = parse_id(&id)?;
    let outcome = state.services.completion.mark_complete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/hospital/stock?kind=blood|plasma
pub async fn hospital_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<KindQuery>,
) -> ApiResult<Json<ApiResponse<Vec<StockView>>>> {
    let kind = query.kind_or_blood()?;
    let stock = state
        .services
        .inventory
        .stock_for_hospital(&auth, kind)
        .await?;
    Ok(Json(ApiResponse::ok(stock)))
}
