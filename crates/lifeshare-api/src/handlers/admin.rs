//! Administrator handlers: stats, hospitals, stock overview, plasma, match
//! read models and triggers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::Value;
use validator::Validate;

use lifeshare_core::types::{HospitalId, InventoryUnitId, Outcome};
use lifeshare_entity::hospital::Hospital;
use lifeshare_entity::inventory::InventoryUnit;
use lifeshare_entity::request::BloodRequest;
use lifeshare_service::{AdminStats, ResponseMatch, StockView};
use lifeshare_worker::Trigger;

use crate::dto::request::{
    CreateHospitalBody, KindQuery, RegisterPlasmaBody, UpdatePlasmaBody, VerifyHospitalBody,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<AdminStats>>> {
    let stats = state.services.admin.stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/admin/hospitals
pub async fn list_hospitals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Hospital>>>> {
    let hospitals = state.services.hospitals.list_all(&auth).await?;
    Ok(Json(ApiResponse::ok(hospitals)))
}

/// POST /api/admin/hospitals
pub async fn create_hospital(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateHospitalBody>,
) -> ApiResult<Json<ApiResponse<Outcome<Hospital>>>> {
    body.validate()?;
    let outcome = state.services.hospitals.create(&auth, body.into()).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// PATCH /api/admin/hospitals/{id}/verify
pub async fn verify_hospital(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<VerifyHospitalBody>,
) -> ApiResult<Json<ApiResponse<Outcome<Hospital>>>> {
    let id: HospitalId = parse_id(&id)?;
    let outcome = state
        .services
        .hospitals
        .set_verified(&auth, id, body.verified)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// DELETE /api/admin/hospitals/{id}
pub async fn delete_hospital(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: HospitalId = parse_id(&id)?;
    state.services.hospitals.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Hospital deleted"))))
}

/// GET /api/admin/inventory?kind=blood|plasma
pub async fn all_inventory(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<KindQuery>,
) -> ApiResult<Json<ApiResponse<Vec<StockView>>>> {
    let kind = query.kind_or_blood()?;
    let stock = state.services.inventory.all_stock(&auth, kind).await?;
    Ok(Json(ApiResponse::ok(stock)))
}

/// POST /api/admin/plasma
pub async fn register_plasma(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<RegisterPlasmaBody>,
) -> ApiResult<Json<ApiResponse<Outcome<InventoryUnit>>>> {
    body.validate()?;
    let outcome = state
        .services
        .inventory
        .register_plasma(&auth, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// PUT /api/admin/plasma/{id}
pub async fn update_plasma(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdatePlasmaBody>,
) -> ApiResult<Json<ApiResponse<Outcome<InventoryUnit>>>> {
    body.validate()?;
    let id: InventoryUnitId = parse_id(&id)?;
    let outcome = state
        .services
        .inventory
        .update_plasma(&auth, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// DELETE /api/admin/plasma/{id}
pub async fn delete_plasma(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: InventoryUnitId = parse_id(&id)?;
    state.services.inventory.delete_plasma(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Plasma unit deleted",
    ))))
}

/// GET /api/admin/matches/responses
pub async fn matches_from_responses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ResponseMatch>>>> {
    let matches = state.services.admin.matches_from_responses(&auth).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

/// GET /api/admin/matches/requests
pub async fn matches_from_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BloodRequest>>>> {
    let matches = state.services.admin.matches_from_requests(&auth).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

/// GET /api/admin/matches/completed
pub async fn completed_matches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BloodRequest>>>> {
    let matches = state.services.admin.completed_matches(&auth).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

/// POST /api/admin/triggers/reminders
pub async fn trigger_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Value>>> {
    auth.require_admin()?;
    tracing::info!(user_id = %auth.user_id, "Donor reminder sweep triggered");
    let report = state.executor.trigger(Trigger::DonorReminders).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /api/admin/triggers/expiry?kind=blood|plasma
///
/// Sweeps both kinds when `kind` is absent.
pub async fn trigger_expiry(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<KindQuery>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    auth.require_admin()?;
    let kind = query.kind()?;
    tracing::info!(user_id = %auth.user_id, kind = ?kind, "Expiry sweep triggered");
    let report = state.executor.trigger(Trigger::Expiry(kind)).await?;
    Ok(Json(ApiResponse::ok(report)))
}
