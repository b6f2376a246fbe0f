//! Blood request repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, RequestId, UserId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::appointment::AppointmentStatus;
use lifeshare_entity::request::{BloodRequest, CreateBloodRequest, RequestStatus};

use crate::store::{CancelledRequest, RequestStore};

/// Repository for blood requests.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Create a new request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStore for RequestRepository {
    async fn create(&self, input: &CreateBloodRequest) -> AppResult<BloodRequest> {
        let details = &input.details;
        sqlx::query_as::<_, BloodRequest>(
            "INSERT INTO blood_requests (id, recipient_id, blood_group, units_needed, urgency, \
             hospital_id, hospital_name, hospital_address, purpose, contact_person, contact_number, \
             contact_email, doctor_name, medical_condition, required_date, additional_notes, \
             patient_name, patient_age, patient_gender, hemoglobin_level) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING *",
        )
        .bind(RequestId::new())
        .bind(input.recipient_id)
        .bind(input.blood_group)
        .bind(input.units_needed)
        .bind(input.urgency)
        .bind(input.hospital_id)
        .bind(&input.hospital_name)
        .bind(&input.hospital_address)
        .bind(&details.purpose)
        .bind(&details.contact_person)
        .bind(&details.contact_number)
        .bind(&details.contact_email)
        .bind(&details.doctor_name)
        .bind(&details.medical_condition)
        .bind(details.required_date)
        .bind(&details.additional_notes)
        .bind(&details.patient_name)
        .bind(details.patient_age)
        .bind(details.patient_gender)
        .bind(details.hemoglobin_level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create blood request", e))
    }

    async fn find_by_id(&self, id: RequestId) -> AppResult<Option<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>("SELECT * FROM blood_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find blood request", e))
    }

    async fn find_by_recipient(&self, recipient_id: UserId) -> AppResult<Vec<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE recipient_id = $1 ORDER BY created_at DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requests by recipient", e)
        })
    }

    async fn find_by_status(&self, statuses: &[RequestStatus]) -> AppResult<Vec<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE status = ANY($1) ORDER BY created_at DESC",
        )
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list requests by status", e))
    }

    async fn find_pending_by_blood_group(
        &self,
        group: BloodGroup,
        limit: i64,
    ) -> AppResult<Vec<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE status = 'pending' AND blood_group = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(group)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list donor feed", e))
    }

    async fn find_by_hospital(
        &self,
        hospital_id: HospitalId,
        statuses: &[RequestStatus],
    ) -> AppResult<Vec<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE hospital_id = $1 AND status = ANY($2) \
             ORDER BY created_at DESC",
        )
        .bind(hospital_id)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requests by hospital", e)
        })
    }

    async fn find_completed(&self, limit: i64) -> AppResult<Vec<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE status = 'completed' \
             ORDER BY updated_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list completed requests", e))
    }

    async fn cancel(
        &self,
        id: RequestId,
        from: &[RequestStatus],
    ) -> AppResult<Option<CancelledRequest>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let cancelled = sqlx::query_as::<_, BloodRequest>(
            "UPDATE blood_requests SET status = 'cancelled', updated_at = NOW() \
             WHERE id = $1 AND status = ANY($2) RETURNING *",
        )
        .bind(id)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel request", e))?;
        let Some(request) = cancelled else {
            return Ok(None);
        };

        let closed = sqlx::query(
            "UPDATE appointments SET status = 'cancelled', updated_at = NOW() \
             WHERE request_id = $1 AND status = ANY($2)",
        )
        .bind(id)
        .bind(AppointmentStatus::allowed_sources(AppointmentStatus::Cancelled))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cancel request appointments", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit request cancellation", e)
        })?;

        Ok(Some(CancelledRequest {
            request,
            closed_appointments: closed.rows_affected(),
        }))
    }
}
