//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AuditLogId, UserId};
use lifeshare_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

use crate::store::AuditStore;

pub(crate) const INSERT_AUDIT: &str = "INSERT INTO audit_logs (id, actor_id, action, target_type, \
     target_id, details) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *";

/// Repository for the audit log.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn append(&self, input: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(INSERT_AUDIT)
            .bind(AuditLogId::new())
            .bind(input.actor_id)
            .bind(&input.action)
            .bind(&input.target_type)
            .bind(input.target_id)
            .bind(&input.details)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write audit log", e))
    }

    async fn find_by_actor(&self, actor_id: UserId) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs WHERE actor_id = $1 ORDER BY created_at DESC",
        )
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit log", e))
    }
}
