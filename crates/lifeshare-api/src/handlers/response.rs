//! Donor response handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use lifeshare_core::types::{Outcome, ResponseId};
use lifeshare_entity::response::DonorResponse;
use lifeshare_service::lifecycle::ResponseDecision;

use crate::dto::request::{CreateResponseBody, DecideResponseBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/responses
pub async fn create_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateResponseBody>,
) -> ApiResult<Json<ApiResponse<Outcome<DonorResponse>>>> {
    let outcome = state
        .services
        .responses
        .create(&auth, body.request_id)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/responses/mine
pub async fn my_responses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<DonorResponse>>>> {
    let responses = state.services.responses.list_mine(&auth).await?;
    Ok(Json(ApiResponse::ok(responses)))
}

/// PATCH /api/responses/{id}
pub async fn decide_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<DecideResponseBody>,
) -> ApiResult<Json<ApiResponse<Outcome<ResponseDecision>>>> {
    body.validate()?;
    let id: ResponseId = parse_id(&id)?;
    let outcome = state
        .services
        .responses
        .decide(&auth, id, &body.status)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
