//! Notification inbox operations for the owning user.

use std::sync::Arc;

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{NotificationId, PageRequest, PageResponse};
use lifeshare_database::store::NotificationStore;
use lifeshare_entity::notification::Notification;

use crate::context::RequestContext;

/// Lists and manages the caller's notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// Lists notifications for the current user, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notifications.find_by_user(ctx.user_id, page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read. Only the owner may do so.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        if self.notifications.mark_read(id, ctx.user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Deletes a notification. Only the owner may do so.
    pub async fn delete(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        if self.notifications.delete(id, ctx.user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }
}
