//! Donation repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::UserId;
use lifeshare_entity::donation::Donation;

use crate::store::DonationStore;

/// Read-side repository for the donation ledger.
#[derive(Debug, Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Create a new donation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationStore for DonationRepository {
    async fn find_by_donor(&self, donor_id: UserId) -> AppResult<Vec<Donation>> {
        sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE donor_id = $1 ORDER BY donation_date DESC, created_at DESC",
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list donations", e))
    }

    async fn count_by_donor(&self, donor_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE donor_id = $1")
            .bind(donor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count donations", e))
    }

    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM donations WHERE $1::timestamptz IS NULL OR donation_date >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count donations", e))
    }

    async fn latest_by_donor(&self, donor_id: UserId) -> AppResult<Option<Donation>> {
        sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE donor_id = $1 \
             ORDER BY donation_date DESC, created_at DESC LIMIT 1",
        )
        .bind(donor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest donation", e))
    }
}
