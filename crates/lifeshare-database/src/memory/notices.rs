use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{
    AuditLogId, InventoryUnitId, NotificationId, PageRequest, PageResponse, UserId,
};
use lifeshare_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use lifeshare_entity::notification::{NewNotification, Notification, NotificationKind};

use super::{MemoryState, MemoryStore};
use crate::store::{AuditStore, NotificationStore};

impl MemoryState {
    pub(crate) fn append_audit(&mut self, input: &CreateAuditLogEntry) -> AuditLogEntry {
        let entry = AuditLogEntry {
            id: AuditLogId::new(),
            actor_id: input.actor_id,
            action: input.action.clone(),
            target_type: input.target_type.clone(),
            target_id: input.target_id,
            details: input.details.clone(),
            created_at: Utc::now(),
        };
        self.audit.push(entry.clone());
        entry
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, input: &NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: NotificationId::new(),
            user_id: input.user_id,
            kind: input.kind,
            title: input.title.clone(),
            message: input.message.clone(),
            hospital_name: input.hospital_name.clone(),
            appointment_time: input.appointment_time.clone(),
            patient_name: input.patient_name.clone(),
            request_id: input.request_id,
            appointment_id: input.appointment_id,
            inventory_unit_id: input.inventory_unit_id,
            read: false,
            created_at: Utc::now(),
        };
        self.write().notifications.push(notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self
            .read()
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mine: Vec<Notification> = self
            .read()
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        Ok(PageResponse::from_ordered(mine, page))
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        let count = self
            .read()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count();
        Ok(count as i64)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.write();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.write();
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(state.notifications.len() < before)
    }

    async fn exists_for_unit_since(
        &self,
        kind: NotificationKind,
        unit_id: InventoryUnitId,
        since: DateTime<Utc>,
    ) -> AppResult<bool> {
        Ok(self.read().notifications.iter().any(|n| {
            n.kind == kind && n.inventory_unit_id == Some(unit_id) && n.created_at >= since
        }))
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, input: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        Ok(self.write().append_audit(input))
    }

    async fn find_by_actor(&self, actor_id: UserId) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .read()
            .audit
            .iter()
            .rev()
            .filter(|e| e.actor_id == actor_id)
            .cloned()
            .collect())
    }
}
