//! Hospital staff handlers: verification, upcoming list, stock.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use lifeshare_core::types::{AppointmentId, Outcome};
use lifeshare_entity::appointment::Appointment;
use lifeshare_service::StockView;
use lifeshare_service::lifecycle::AppointmentUpdate;

use crate::dto::request::{AppointmentStatusBody, KindQuery, StockAdjustBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/staff/appointments/{id}/verify
pub async fn verify_appointment(
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
        .staff_verify(&auth, id, status, body.notes)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/staff/appointments/upcoming
pub async fn upcoming_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Appointment>>>> {
    let appointments = state.services.appointments.staff_upcoming(&auth).await?;
    Ok(Json(ApiResponse::ok(appointments)))
}

/// GET /api/staff/stock
///
/// `?low=true` narrows the listing to blood groups below the threshold.
pub async fn staff_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StaffStockQuery>,
) -> ApiResult<Json<ApiResponse<Vec<StockView>>>> {
    let stock = if query.low {
        state.services.inventory.low_stock(&auth).await?
    } else {
        let kind = KindQuery { kind: query.kind }.kind_or_blood()?;
        state
            .services
            .inventory
            .stock_for_hospital(&auth, kind)
            .await?
    };
    Ok(Json(ApiResponse::ok(stock)))
}

/// Query of the staff stock view.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StaffStockQuery {
    #[serde(default)]
    pub low: bool,
    pub kind: Option<String>,
}

/// POST /api/staff/stock/adjust
pub async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StockAdjustBody>,
) -> ApiResult<Json<ApiResponse<Outcome<StockView>>>> {
    body.validate()?;
    let outcome = state.services.inventory.adjust(&auth, body.into()).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
