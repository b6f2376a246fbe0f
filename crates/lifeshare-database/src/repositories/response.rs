//! Donor response repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{RequestId, ResponseId, UserId};
use lifeshare_entity::response::{DonorResponse, ResponseStatus};

use crate::store::ResponseStore;

/// Repository for donor responses.
#[derive(Debug, Clone)]
pub struct ResponseRepository {
    pool: PgPool,
}

impl ResponseRepository {
    /// Create a new response repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseStore for ResponseRepository {
    async fn create(&self, donor_id: UserId, request_id: RequestId) -> AppResult<DonorResponse> {
        sqlx::query_as::<_, DonorResponse>(
            "INSERT INTO donor_responses (id, donor_id, request_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(ResponseId::new())
        .bind(donor_id)
        .bind(request_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::conflict("You have already responded to this request")
            }
            other => AppError::with_source(ErrorKind::Database, "Failed to create response", other),
        })
    }

    async fn find_by_id(&self, id: ResponseId) -> AppResult<Option<DonorResponse>> {
        sqlx::query_as::<_, DonorResponse>("SELECT * FROM donor_responses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find response", e))
    }

    async fn find_by_donor_and_request(
        &self,
        donor_id: UserId,
        request_id: RequestId,
    ) -> AppResult<Option<DonorResponse>> {
        sqlx::query_as::<_, DonorResponse>(
            "SELECT * FROM donor_responses WHERE donor_id = $1 AND request_id = $2",
        )
        .bind(donor_id)
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find response", e))
    }

    async fn find_by_request(&self, request_id: RequestId) -> AppResult<Vec<DonorResponse>> {
        sqlx::query_as::<_, DonorResponse>(
            "SELECT * FROM donor_responses WHERE request_id = $1 ORDER BY created_at",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list responses", e))
    }

    async fn find_for_recipient(&self, recipient_id: UserId) -> AppResult<Vec<DonorResponse>> {
        sqlx::query_as::<_, DonorResponse>(
            "SELECT r.* FROM donor_responses r \
             JOIN blood_requests br ON br.id = r.request_id \
             WHERE br.recipient_id = $1 ORDER BY r.created_at DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list responses for recipient", e)
        })
    }

    async fn find_by_status(&self, status: ResponseStatus) -> AppResult<Vec<DonorResponse>> {
        sqlx::query_as::<_, DonorResponse>(
            "SELECT * FROM donor_responses WHERE status = $1 ORDER BY updated_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list responses", e))
    }

    async fn transition(
        &self,
        id: ResponseId,
        from: ResponseStatus,
        to: ResponseStatus,
    ) -> AppResult<Option<DonorResponse>> {
        sqlx::query_as::<_, DonorResponse>(
            "UPDATE donor_responses SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update response", e))
    }
}
