//! Donation history handlers.

use axum::Json;
use axum::extract::State;

use lifeshare_entity::donation::Donation;

use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/donations/mine
pub async fn my_donations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Donation>>>> {
    let donations = state.services.donations.history(&auth).await?;
    Ok(Json(ApiResponse::ok(donations)))
}

/// GET /api/donations/mine/count
pub async fn donation_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.services.donations.count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/donations/mine/latest
pub async fn latest_donation(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Option<Donation>>>> {
    let latest = state.services.donations.latest(&auth).await?;
    Ok(Json(ApiResponse::ok(latest)))
}
