//! Audit log persistence.

use async_trait::async_trait;

use lifeshare_core::result::AppResult;
use lifeshare_core::types::UserId;
use lifeshare_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

/// Append-only audit log.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append an entry.
    async fn append(&self, input: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Entries written by an actor, newest first.
    async fn find_by_actor(&self, actor_id: UserId) -> AppResult<Vec<AuditLogEntry>>;
}
