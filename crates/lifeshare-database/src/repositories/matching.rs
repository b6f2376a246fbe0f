//! Match commit on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::AppointmentId;
use lifeshare_entity::appointment::Appointment;
use lifeshare_entity::request::BloodRequest;
use lifeshare_entity::response::DonorResponse;

use crate::repositories::appointment::INSERT_APPOINTMENT;
use crate::store::{CommittedMatch, MatchCommit, MatchKind, MatchStore};

/// Binds donors to requests inside a transaction.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    /// Create a new match repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for MatchRepository {
    async fn commit_match(&self, commit: &MatchCommit) -> AppResult<Option<CommittedMatch>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Returning early drops `tx`, which rolls back.
        let (request, response, declined_responses) = match commit.kind {
            MatchKind::Direct => {
                let request = sqlx::query_as::<_, BloodRequest>(
                    "UPDATE blood_requests SET status = 'accepted', donor_id = $2, \
                     donor_response = 'accepted', recipient_status = 'accepted', updated_at = NOW() \
                     WHERE id = $1 AND status = 'pending' RETURNING *",
                )
                .bind(commit.request_id)
                .bind(commit.donor_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to accept request", e))?;

                match request {
                    Some(request) => (request, None, 0),
                    None => return Ok(None),
                }
            }
            MatchKind::Response(response_id) => {
                let response = sqlx::query_as::<_, DonorResponse>(
                    "UPDATE donor_responses SET status = 'accepted', updated_at = NOW() \
                     WHERE id = $1 AND request_id = $2 AND status = 'pending' RETURNING *",
                )
                .bind(response_id)
                .bind(commit.request_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to accept response", e))?;

                let Some(response) = response else {
                    return Ok(None);
                };

                let request = sqlx::query_as::<_, BloodRequest>(
                    "UPDATE blood_requests SET status = 'matched', donor_id = $2, \
                     units_needed = COALESCE(units_needed, 1), \
                     urgency = CASE WHEN urgency = 'urgent' THEN 'critical'::urgency_level ELSE urgency END, \
                     updated_at = NOW() \
                     WHERE id = $1 AND status = 'pending' RETURNING *",
                )
                .bind(commit.request_id)
                .bind(commit.donor_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to match request", e))?;

                let Some(request) = request else {
                    return Ok(None);
                };

                let declined = sqlx::query(
                    "UPDATE donor_responses SET status = 'declined', updated_at = NOW() \
                     WHERE request_id = $1 AND id <> $2 AND status = 'pending'",
                )
                .bind(commit.request_id)
                .bind(response_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to decline sibling responses", e)
                })?;

                (request, Some(response), declined.rows_affected())
            }
        };

        let input = &commit.appointment;
        let appointment = sqlx::query_as::<_, Appointment>(INSERT_APPOINTMENT)
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
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create appointment", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit match", e)
        })?;

        Ok(Some(CommittedMatch {
            request,
            appointment,
            response,
            declined_responses,
        }))
    }
}
