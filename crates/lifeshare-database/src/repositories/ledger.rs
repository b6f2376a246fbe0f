//! Donation commit on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AuditLogId, DonationId};
use lifeshare_entity::appointment::{Appointment, AppointmentStatus};
use lifeshare_entity::audit::AuditLogEntry;
use lifeshare_entity::donation::Donation;
use lifeshare_entity::request::{BloodRequest, RequestStatus};

use crate::repositories::appointment::TRANSITION_APPOINTMENT;
use crate::repositories::audit::INSERT_AUDIT;
use crate::repositories::inventory::apply_delta_on;
use crate::store::{DonationCommit, DonationLedgerStore, DonationReceipt};

/// Records donations and their side effects in one transaction.
#[derive(Debug, Clone)]
pub struct DonationLedgerRepository {
    pool: PgPool,
}

impl DonationLedgerRepository {
    /// Create a new ledger repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationLedgerStore for DonationLedgerRepository {
    async fn commit_donation(&self, commit: &DonationCommit) -> AppResult<Option<DonationReceipt>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let appointment = match &commit.appointment {
            Some(transition) => {
                let verification = transition.verification;
                let updated = sqlx::query_as::<_, Appointment>(TRANSITION_APPOINTMENT)
                    .bind(transition.appointment_id)
                    .bind(&transition.from[..])
                    .bind(AppointmentStatus::Donated)
                    .bind(verification.map(|v| v.verified_by))
                    .bind(verification.map(|v| v.hospital_id))
                    .bind(verification.map(|v| v.verified_at))
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to mark appointment donated", e)
                    })?;
                match updated {
                    Some(appointment) => Some(appointment),
                    None => return Ok(None),
                }
            }
            None => None,
        };

        let inventory = apply_delta_on(&mut tx, &commit.stock, commit.units).await?;

        let input = &commit.donation;
        let donation = sqlx::query_as::<_, Donation>(
            "INSERT INTO donations (id, donor_id, blood_group, units, hospital_id, hospital_name, \
             appointment_id, request_id, donation_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(DonationId::new())
        .bind(input.donor_id)
        .bind(input.blood_group)
        .bind(input.units)
        .bind(input.hospital_id)
        .bind(&input.hospital_name)
        .bind(input.appointment_id)
        .bind(input.request_id)
        .bind(input.donation_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append donation", e))?;

        sqlx::query("UPDATE users SET last_donation_date = $2 WHERE id = $1")
            .bind(input.donor_id)
            .bind(input.donation_date)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to stamp last donation date", e)
            })?;

        let request = match commit.request {
            Some(completion) => {
                let completed = sqlx::query_as::<_, BloodRequest>(
                    "UPDATE blood_requests SET status = 'completed', updated_at = NOW() \
                     WHERE id = $1 AND status = ANY($2) AND donor_id = $3 RETURNING *",
                )
                .bind(completion.request_id)
                .bind(&RequestStatus::BOUND[..])
                .bind(input.donor_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete request", e))?;

                match completed {
                    Some(request) => {
                        sqlx::query(
                            "UPDATE appointments SET status = 'donated', updated_at = NOW() \
                             WHERE request_id = $1 AND donor_id = $2 AND status = ANY($3)",
                        )
                        .bind(completion.request_id)
                        .bind(input.donor_id)
                        .bind(AppointmentStatus::allowed_sources(AppointmentStatus::Donated))
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to close request appointments",
                                e,
                            )
                        })?;
                        Some(request)
                    }
                    None if completion.required => return Ok(None),
                    None => None,
                }
            }
            None => None,
        };

        let audit = sqlx::query_as::<_, AuditLogEntry>(INSERT_AUDIT)
            .bind(AuditLogId::new())
            .bind(commit.audit.actor_id)
            .bind(&commit.audit.action)
            .bind(&commit.audit.target_type)
            .bind(commit.audit.target_id)
            .bind(&commit.audit.details)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write audit log", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit donation", e)
        })?;

        Ok(Some(DonationReceipt {
            appointment,
            inventory,
            donation,
            request,
            audit,
        }))
    }
}
