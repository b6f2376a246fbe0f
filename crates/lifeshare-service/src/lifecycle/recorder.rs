//! Records a donation and its side effects as one commit.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, UserId};
use lifeshare_database::store::{
    AppointmentTransition, DonationCommit, DonationLedgerStore, DonationReceipt,
    RequestCompletion, UserStore,
};
use lifeshare_entity::appointment::{Appointment, AppointmentStatus, Verification};
use lifeshare_entity::audit::{CreateAuditLogEntry, targets};
use lifeshare_entity::donation::CreateDonation;
use lifeshare_entity::inventory::StockKey;
use lifeshare_entity::notification::{NewNotification, NotificationKind};
use lifeshare_entity::request::BloodRequest;
use lifeshare_entity::user::User;

use crate::lookup;
use crate::notification::NotificationDispatcher;

/// A committed donation and the donor it was credited to.
#[derive(Debug, Clone)]
pub(crate) struct RecordedDonation {
    pub receipt: DonationReceipt,
    pub donor: User,
}

/// Who is recording a donation, and how.
#[derive(Debug, Clone)]
pub(crate) struct DonationActor {
    pub actor_id: UserId,
    pub action: &'static str,
    /// Staff stamp written onto the appointment.
    pub verification: Option<Verification>,
    pub notes: Option<String>,
}

/// Builds [`DonationCommit`]s and sends the notifications that follow them.
#[derive(Debug, Clone)]
pub(crate) struct DonationRecorder {
    users: Arc<dyn UserStore>,
    ledger: Arc<dyn DonationLedgerStore>,
    dispatcher: NotificationDispatcher,
}

impl DonationRecorder {
    pub fn new(
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn DonationLedgerStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            users,
            ledger,
            dispatcher,
        }
    }

    /// Move an open appointment to `donated` and record one unit.
    ///
    /// Inventory is credited at the verifying hospital when there is one,
    /// else at the appointment's hospital. A linked request still bound to
    /// this donor is completed in the same commit.
    pub async fn record_appointment(
        &self,
        appointment: &Appointment,
        actor: DonationActor,
    ) -> AppResult<RecordedDonation> {
        let donor = lookup::user(self.users.as_ref(), appointment.donor_id).await?;
        let blood_group = donor
            .blood_group
            .ok_or_else(|| AppError::validation("Donor blood group is not set"))?;
        let hospital_id = actor
            .verification
            .map(|v| v.hospital_id)
            .unwrap_or(appointment.hospital_id);
        let now = Utc::now();

        let commit = DonationCommit {
            appointment: Some(AppointmentTransition {
                appointment_id: appointment.id,
                from: AppointmentStatus::allowed_sources(AppointmentStatus::Donated),
                verification: actor.verification,
            }),
            stock: StockKey::blood(hospital_id, blood_group),
            units: 1,
            donation: CreateDonation {
                donor_id: donor.id,
                blood_group,
                units: 1,
                hospital_id,
                hospital_name: appointment.hospital_name.clone(),
                appointment_id: Some(appointment.id),
                request_id: appointment.request_id,
                donation_date: now,
            },
            request: appointment.request_id.map(|request_id| RequestCompletion {
                request_id,
                required: false,
            }),
            audit: CreateAuditLogEntry::new(
                actor.actor_id,
                actor.action,
                targets::APPOINTMENT,
                Some(appointment.id.into_uuid()),
                json!({
                    "donor_id": donor.id,
                    "blood_group": blood_group,
                    "hospital_id": hospital_id,
                    "request_id": appointment.request_id,
                    "notes": actor.notes,
                }),
            ),
        };

        let receipt = self
            .ledger
            .commit_donation(&commit)
            .await?
            .ok_or_else(|| AppError::conflict("Appointment is no longer open for donation"))?;

        info!(
            appointment_id = %appointment.id,
            donor_id = %donor.id,
            blood_group = %blood_group,
            hospital_id = %hospital_id,
            units_available = receipt.inventory.units_available,
            request_completed = receipt.request.is_some(),
            "Donation recorded from appointment"
        );

        if let Some(request) = &receipt.request {
            self.notify_recipient(request, &appointment.hospital_name).await;
        }
        Ok(RecordedDonation { receipt, donor })
    }

    /// Complete a bound request and record its units, without an appointment.
    pub async fn record_request(
        &self,
        request: &BloodRequest,
        hospital_id: HospitalId,
        actor: DonationActor,
    ) -> AppResult<RecordedDonation> {
        let donor_id = request
            .donor_id
            .ok_or_else(|| AppError::conflict("Request has no bound donor"))?;
        let donor = lookup::user(self.users.as_ref(), donor_id).await?;
        let blood_group = donor.blood_group.unwrap_or(request.blood_group);
        let units = request.effective_units();

        let commit = DonationCommit {
            appointment: None,
            stock: StockKey::blood(hospital_id, blood_group),
            units,
            donation: CreateDonation {
                donor_id,
                blood_group,
                units,
                hospital_id,
                hospital_name: request.hospital_name.clone(),
                appointment_id: None,
                request_id: Some(request.id),
                donation_date: Utc::now(),
            },
            request: Some(RequestCompletion {
                request_id: request.id,
                required: true,
            }),
            audit: CreateAuditLogEntry::new(
                actor.actor_id,
                actor.action,
                targets::BLOOD_REQUEST,
                Some(request.id.into_uuid()),
                json!({
                    "donor_id": donor_id,
                    "recipient_id": request.recipient_id,
                    "blood_group": blood_group,
                    "units_needed": units,
                    "hospital_id": hospital_id,
                    "notes": actor.notes,
                }),
            ),
        };

        let receipt = self
            .ledger
            .commit_donation(&commit)
            .await?
            .ok_or_else(|| AppError::conflict("Request is not in accepted/matched status"))?;

        info!(
            request_id = %request.id,
            donor_id = %donor_id,
            hospital_id = %hospital_id,
            units,
            "Donation recorded from request completion"
        );

        self.notify_recipient(request, &request.hospital_name).await;
        Ok(RecordedDonation { receipt, donor })
    }

    async fn notify_recipient(&self, request: &BloodRequest, hospital_name: &str) {
        self.dispatcher
            .record(
                NewNotification::new(
                    request.recipient_id,
                    NotificationKind::DonationCompleted,
                    "Blood Donation Completed",
                    format!(
                        "Your blood request has been fulfilled. A donor has successfully donated at {hospital_name}."
                    ),
                )
                .hospital(hospital_name)
                .patient(request.details.patient_name.clone())
                .request(request.id),
            )
            .await;
    }
}
