//! Hospital repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::HospitalId;
use lifeshare_entity::hospital::{CreateHospital, Hospital};

use crate::store::HospitalStore;
use crate::store::hospital::IN_USE_MESSAGE;

/// SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Repository for hospitals.
#[derive(Debug, Clone)]
pub struct HospitalRepository {
    pool: PgPool,
}

impl HospitalRepository {
    /// Create a new hospital repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HospitalStore for HospitalRepository {
    async fn create(&self, input: &CreateHospital) -> AppResult<Hospital> {
        sqlx::query_as::<_, Hospital>(
            "INSERT INTO hospitals (id, name, email, phone, city, pincode, address, verified) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(HospitalId::new())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.city)
        .bind(&input.pincode)
        .bind(&input.address)
        .bind(input.verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create hospital", e))
    }

    async fn find_by_id(&self, id: HospitalId) -> AppResult<Option<Hospital>> {
        sqlx::query_as::<_, Hospital>("SELECT * FROM hospitals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find hospital", e))
    }

    async fn find_all(&self) -> AppResult<Vec<Hospital>> {
        sqlx::query_as::<_, Hospital>("SELECT * FROM hospitals ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list hospitals", e))
    }

    async fn find_verified(&self) -> AppResult<Vec<Hospital>> {
        sqlx::query_as::<_, Hospital>("SELECT * FROM hospitals WHERE verified ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list verified hospitals", e)
            })
    }

    async fn set_verified(&self, id: HospitalId, verified: bool) -> AppResult<Option<Hospital>> {
        sqlx::query_as::<_, Hospital>(
            "UPDATE hospitals SET verified = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(verified)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to verify hospital", e))
    }

    async fn delete(&self, id: HospitalId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM hospitals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let in_use = e
                    .as_database_error()
                    .and_then(|db| db.code())
                    .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);
                if in_use {
                    AppError::conflict(IN_USE_MESSAGE)
                } else {
                    AppError::with_source(ErrorKind::Database, "Failed to delete hospital", e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }
}
