//! Hospital-side completion of bound requests.

use std::sync::Arc;

use serde::Serialize;

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{Outcome, RequestId};
use lifeshare_database::store::{DonationLedgerStore, RequestStore, UserStore};
use lifeshare_entity::audit::actions;
use lifeshare_entity::donation::Donation;
use lifeshare_entity::inventory::InventoryUnit;
use lifeshare_entity::request::{BloodRequest, RequestStatus};
use lifeshare_entity::user::UserRole;

use super::recorder::{DonationActor, DonationRecorder};
use crate::context::RequestContext;
use crate::lookup;
use crate::notification::NotificationDispatcher;

/// A request completed by its hospital.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedRequest {
    pub request: BloodRequest,
    pub donation: Donation,
    pub inventory: InventoryUnit,
}

/// Lets a hospital close requests whose donor has given blood.
#[derive(Debug, Clone)]
pub struct CompletionService {
    requests: Arc<dyn RequestStore>,
    recorder: DonationRecorder,
}

impl CompletionService {
    pub fn new(
        requests: Arc<dyn RequestStore>,
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn DonationLedgerStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            requests,
            recorder: DonationRecorder::new(users, ledger, dispatcher),
        }
    }

    /// Requests at the caller's hospital that have a donor bound.
    pub async fn accepted_requests(&self, ctx: &RequestContext) -> AppResult<Vec<BloodRequest>> {
        let hospital_id = ctx.require_hospital()?;
        self.requests
            .find_by_hospital(hospital_id, &RequestStatus::BOUND)
            .await
    }

    /// Mark a bound request complete, crediting its units to the caller's hospital.
    pub async fn mark_complete(
        &self,
        ctx: &RequestContext,
        id: RequestId,
    ) -> AppResult<Outcome<CompletedRequest>> {
        ctx.require_role(&[UserRole::Hospital, UserRole::HospitalStaff])?;
        let hospital_id = ctx.require_hospital()?;
        let request = lookup::request(self.requests.as_ref(), id).await?;
        if request.hospital_id != hospital_id {
            return Err(AppError::authorization(
                "Access denied. Request not for your hospital.",
            ));
        }
        if !request.status.has_donor() {
            return Err(AppError::conflict(
                "Request is not in accepted/matched status",
            ));
        }

        let recorded = self
            .recorder
            .record_request(
                &request,
                hospital_id,
                DonationActor {
                    actor_id: ctx.user_id,
                    action: actions::DONATION_COMPLETED,
                    verification: None,
                    notes: None,
                },
            )
            .await?;
        let receipt = recorded.receipt;
        let request = receipt
            .request
            .ok_or_else(|| AppError::internal("Donation commit returned no request"))?;

        Ok(Outcome::new(
            "Donation marked as completed",
            CompletedRequest {
                request,
                donation: receipt.donation,
                inventory: receipt.inventory,
            },
        ))
    }
}
