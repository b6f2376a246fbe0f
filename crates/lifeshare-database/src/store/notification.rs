//! Notification persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{InventoryUnitId, NotificationId, PageRequest, PageResponse, UserId};
use lifeshare_entity::notification::{NewNotification, Notification, NotificationKind};

/// Persistence operations on in-app notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a notification.
    async fn create(&self, input: &NewNotification) -> AppResult<Notification>;

    /// Find a notification by primary key.
    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// Notifications for a user, newest first.
    async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Count unread notifications for a user.
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;

    /// Mark a notification read. Returns `false` if the user does not own it.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool>;

    /// Delete a notification. Returns `false` if the user does not own it.
    async fn delete(&self, id: NotificationId, user_id: UserId) -> AppResult<bool>;

    /// Whether a notification of `kind` about `unit_id` was created at or after `since`.
    async fn exists_for_unit_since(
        &self,
        kind: NotificationKind,
        unit_id: InventoryUnitId,
        since: DateTime<Utc>,
    ) -> AppResult<bool>;
}
