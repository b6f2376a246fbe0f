//! Hospital directory: admin registration and verification, and the
//! verified listing donors pick from when booking.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, Outcome};
use lifeshare_database::store::{AuditStore, HospitalStore};
use lifeshare_entity::audit::{CreateAuditLogEntry, actions, targets};
use lifeshare_entity::hospital::{CreateHospital, Hospital};

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct HospitalService {
    hospitals: Arc<dyn HospitalStore>,
    audit: Arc<dyn AuditStore>,
}

impl HospitalService {
    pub fn new(hospitals: Arc<dyn HospitalStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self { hospitals, audit }
    }

    /// Verified hospitals by name. Open to any signed-in user.
    pub async fn list_verified(&self) -> AppResult<Vec<Hospital>> {
        self.hospitals.find_verified().await
    }

    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Hospital>> {
        ctx.require_admin()?;
        self.hospitals.find_all().await
    }

    /// Register a hospital. New hospitals start unverified unless the input
    /// says otherwise.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateHospital,
    ) -> AppResult<Outcome<Hospital>> {
        ctx.require_admin()?;
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(AppError::validation("Hospital name and email are required"));
        }

        let hospital = self.hospitals.create(&input).await?;
        info!(hospital_id = %hospital.id, name = %hospital.name, "Hospital registered");
        self.record(ctx, actions::HOSPITAL_CREATED, &hospital).await;
        Ok(Outcome::new("Hospital created", hospital))
    }

    /// Set or clear the verification flag. Verifying needs a name and an
    /// email on file; clearing it never does.
    pub async fn set_verified(
        &self,
        ctx: &RequestContext,
        id: HospitalId,
        verified: bool,
    ) -> AppResult<Outcome<Hospital>> {
        ctx.require_admin()?;
        let current = self
            .hospitals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital not found"))?;
        if verified && !current.has_contact_details() {
            return Err(AppError::validation(
                "Hospital needs a name and email before it can be verified",
            ));
        }

        let hospital = self
            .hospitals
            .set_verified(id, verified)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital not found"))?;
        info!(hospital_id = %id, verified, "Hospital verification updated");
        self.record(ctx, actions::HOSPITAL_VERIFIED, &hospital).await;

        let message = if verified {
            "Hospital verified"
        } else {
            "Hospital verification revoked"
        };
        Ok(Outcome::new(message, hospital))
    }

    /// Delete a hospital nothing references yet.
    pub async fn delete(&self, ctx: &RequestContext, id: HospitalId) -> AppResult<()> {
        ctx.require_admin()?;
        let hospital = self
            .hospitals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital not found"))?;
        if !self.hospitals.delete(id).await? {
            return Err(AppError::not_found("Hospital not found"));
        }
        info!(hospital_id = %id, "Hospital deleted");
        self.record(ctx, actions::HOSPITAL_DELETED, &hospital).await;
        Ok(())
    }

    async fn record(&self, ctx: &RequestContext, action: &str, hospital: &Hospital) {
        let entry = CreateAuditLogEntry::new(
            ctx.user_id,
            action,
            targets::HOSPITAL,
            Some(hospital.id.into_uuid()),
            json!({ "name": hospital.name, "verified": hospital.verified }),
        );
        if let Err(e) = self.audit.append(&entry).await {
            warn!(hospital_id = %hospital.id, error = %e, "Failed to write hospital audit entry");
        }
    }
}
