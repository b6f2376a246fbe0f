//! Blood request handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use lifeshare_core::types::{Outcome, RequestId};
use lifeshare_entity::request::BloodRequest;
use lifeshare_service::{MatchReport, MatchResult};

use crate::dto::request::CreateRequestBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRequestBody>,
) -> ApiResult<Json<ApiResponse<Outcome<BloodRequest>>>> {
    body.validate()?;
    let outcome = state.services.requests.create(&auth, body.into()).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BloodRequest>>> {
    let id: RequestId = parse_id(&id)?;
    let request = state.services.requests.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/requests/mine
pub async fn my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BloodRequest>>>> {
    let requests = state.services.requests.list_mine(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// GET /api/requests/pending
pub async fn pending_requests(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BloodRequest>>>> {
    let requests = state.services.requests.list_pending().await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// GET /api/requests/feed
pub async fn donor_feed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BloodRequest>>>> {
    let requests = state.services.requests.donor_feed(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// POST /api/requests/{id}/accept
pub async fn accept_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Outcome<MatchResult>>>> {
    let id: RequestId = parse_id(&id)?;
    let outcome = state.services.requests.accept(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/requests/{id}/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Outcome<BloodRequest>>>> {
    let id: RequestId = parse_id(&id)?;
    let outcome = state.services.requests.cancel(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/requests/{id}/notify-donors
pub async fn notify_donors(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Outcome<MatchReport>>>> {
    let id: RequestId = parse_id(&id)?;
    let outcome = state.services.matching.notify_for_request(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
