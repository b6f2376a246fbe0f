//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use lifeshare_core::types::{NotificationId, PageResponse};
use lifeshare_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Notification>>>> {
    let page = state
        .services
        .notifications
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.services.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: NotificationId = parse_id(&id)?;
    state.services.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Marked as read"))))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: NotificationId = parse_id(&id)?;
    state.services.notifications.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Notification deleted",
    ))))
}
