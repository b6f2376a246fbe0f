//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, UserId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::user::{CreateUser, User, UserRole};

use crate::store::UserStore;

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, input: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, role, full_name, email, phone_number, city, state, blood_group, \
             hospital_id, staff_role, last_donation_date, last_reminder_sent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(UserId::new())
        .bind(input.role)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone_number)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.blood_group)
        .bind(input.hospital_id)
        .bind(input.staff_role)
        .bind(input.last_donation_date)
        .bind(input.last_reminder_sent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user", e))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_donors_by_blood_group(&self, group: BloodGroup) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'donor' AND blood_group = $1 ORDER BY created_at",
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find matching donors", e))
    }

    async fn find_reminder_candidates(
        &self,
        donated_before: DateTime<Utc>,
        reminded_before: DateTime<Utc>,
    ) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'donor' \
             AND last_donation_date <= $1 \
             AND (last_reminder_sent IS NULL OR last_reminder_sent <= $2) \
             ORDER BY last_donation_date",
        )
        .bind(donated_before)
        .bind(reminded_before)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find reminder candidates", e)
        })
    }

    async fn find_staff_by_hospital(&self, hospital_id: HospitalId) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'hospital_staff' AND hospital_id = $1 ORDER BY full_name",
        )
        .bind(hospital_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find hospital staff", e))
    }

    async fn count_by_role(&self, role: Option<UserRole>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE $1::user_role IS NULL OR role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))
    }

    async fn mark_reminder_sent(&self, id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_reminder_sent = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to stamp reminder", e))?;
        Ok(())
    }
}
