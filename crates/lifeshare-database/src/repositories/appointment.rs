//! Appointment repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AppointmentId, HospitalId, UserId};
use lifeshare_entity::appointment::{
    Appointment, AppointmentStatus, CreateAppointment, Verification,
};

use crate::store::AppointmentStore;

pub(crate) const INSERT_APPOINTMENT: &str = "INSERT INTO appointments (id, donor_id, recipient_id, \
     request_id, appointment_date, appointment_time, hospital_id, hospital_name, hospital_address, notes) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *";

pub(crate) const TRANSITION_APPOINTMENT: &str = "UPDATE appointments SET status = $3, \
     verified_by = COALESCE($4, verified_by), \
     verified_hospital_id = COALESCE($5, verified_hospital_id), \
     verified_at = COALESCE($6, verified_at), updated_at = NOW() \
     WHERE id = $1 AND status = ANY($2) RETURNING *";

/// Repository for appointments.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    /// Create a new appointment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    async fn create(&self, input: &CreateAppointment) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>(INSERT_APPOINTMENT)
            .bind(AppointmentId::new())
            .bind(input.donor_id)
            .bind(input.recipient_id)
            .bind(input.request_id)
            .bind(input.appointment_date)
            .bind(&input.appointment_time)
            .bind(input.hospital_id)
            .bind(&input.hospital_name)
            .bind(&input.hospital_address)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create appointment", e))
    }

    async fn find_by_id(&self, id: AppointmentId) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find appointment", e))
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE donor_id = $1 OR recipient_id = $1 \
             ORDER BY appointment_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))
    }

    async fn find_by_hospital(&self, hospital_id: HospitalId) -> AppResult<Vec<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE hospital_id = $1 ORDER BY appointment_date DESC",
        )
        .bind(hospital_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list hospital appointments", e)
        })
    }

    async fn find_upcoming_by_hospital(
        &self,
        hospital_id: HospitalId,
        from: DateTime<Utc>,
    ) -> AppResult<Vec<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE hospital_id = $1 AND status = 'scheduled' \
             AND appointment_date >= $2 ORDER BY appointment_date",
        )
        .bind(hospital_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list upcoming appointments", e)
        })
    }

    async fn set_confirmed(&self, id: AppointmentId) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET confirmed = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to confirm appointment", e))
    }

    async fn transition(
        &self,
        id: AppointmentId,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
        verification: Option<Verification>,
    ) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(TRANSITION_APPOINTMENT)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(verification.map(|v| v.verified_by))
            .bind(verification.map(|v| v.hospital_id))
            .bind(verification.map(|v| v.verified_at))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update appointment status", e)
            })
    }
}
