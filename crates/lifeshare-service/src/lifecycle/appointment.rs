//! Appointment booking, attendance, and the three routes to an outcome:
//! the attendee, hospital staff verification, and the hospital account.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AppointmentId, HospitalId, Outcome, RequestId};
use lifeshare_database::store::{
    AppointmentStore, AuditStore, DonationLedgerStore, HospitalStore, RequestStore, UserStore,
};
use lifeshare_entity::appointment::{
    Appointment, AppointmentStatus, CreateAppointment, Verification,
};
use lifeshare_entity::audit::{CreateAuditLogEntry, actions, targets};
use lifeshare_entity::donation::Donation;
use lifeshare_entity::inventory::InventoryUnit;
use lifeshare_entity::notification::{NewNotification, NotificationKind};
use lifeshare_entity::request::BloodRequest;
use lifeshare_entity::user::UserRole;

use super::recorder::{DonationActor, DonationRecorder, RecordedDonation};
use crate::context::RequestContext;
use crate::lookup;
use crate::notification::NotificationDispatcher;

/// Input for booking a donation appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointment {
    pub hospital_id: HospitalId,
    pub appointment_date: DateTime<Utc>,
    pub appointment_time: Option<String>,
    /// Request the donation is directed at, if any.
    pub request_id: Option<RequestId>,
    pub notes: Option<String>,
}

/// An appointment after a status change, with any donation it produced.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentUpdate {
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation: Option<Donation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryUnit>,
    /// The linked request, when the donation completed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BloodRequest>,
}

impl AppointmentUpdate {
    fn status_only(appointment: Appointment) -> Self {
        Self {
            appointment,
            donation: None,
            inventory: None,
            request: None,
        }
    }

    fn donated(recorded: RecordedDonation) -> AppResult<Self> {
        let receipt = recorded.receipt;
        let appointment = receipt
            .appointment
            .ok_or_else(|| AppError::internal("Donation commit returned no appointment"))?;
        Ok(Self {
            appointment,
            donation: Some(receipt.donation),
            inventory: Some(receipt.inventory),
            request: receipt.request,
        })
    }
}

/// Scheduling and outcome recording for donation appointments.
#[derive(Debug, Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentStore>,
    hospitals: Arc<dyn HospitalStore>,
    requests: Arc<dyn RequestStore>,
    audit: Arc<dyn AuditStore>,
    recorder: DonationRecorder,
    dispatcher: NotificationDispatcher,
}

impl AppointmentService {
    /// Creates a new appointment service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        hospitals: Arc<dyn HospitalStore>,
        requests: Arc<dyn RequestStore>,
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn DonationLedgerStore>,
        audit: Arc<dyn AuditStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            appointments,
            hospitals,
            requests,
            audit,
            recorder: DonationRecorder::new(users, ledger, dispatcher.clone()),
            dispatcher,
        }
    }

    /// The calling donor books a donation at a verified hospital.
    pub async fn book(
        &self,
        ctx: &RequestContext,
        input: BookAppointment,
    ) -> AppResult<Outcome<Appointment>> {
        ctx.require_role(&[UserRole::Donor])?;
        let hospital = self
            .hospitals
            .find_by_id(input.hospital_id)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital not found"))?;
        if !hospital.verified {
            return Err(AppError::validation(
                "Cannot book appointment at unverified hospital",
            ));
        }
        let recipient_id = match input.request_id {
            Some(request_id) => {
                let request = lookup::request(self.requests.as_ref(), request_id).await?;
                if !request.accepts_booking_from(ctx.user_id) {
                    return Err(AppError::conflict(format!(
                        "Request is {} and not open to this donor",
                        request.status
                    )));
                }
                Some(request.recipient_id)
            }
            None => None,
        };

        let address = [
            hospital.address.as_deref(),
            hospital.city.as_deref(),
            hospital.pincode.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");

        let appointment = self
            .appointments
            .create(&CreateAppointment {
                donor_id: ctx.user_id,
                recipient_id,
                request_id: input.request_id,
                appointment_date: input.appointment_date,
                appointment_time: input.appointment_time,
                hospital_id: hospital.id,
                hospital_name: hospital.name,
                hospital_address: (!address.is_empty()).then_some(address),
                notes: input.notes,
            })
            .await?;

        info!(
            appointment_id = %appointment.id,
            donor_id = %ctx.user_id,
            hospital_id = %appointment.hospital_id,
            "Appointment booked"
        );
        Ok(Outcome::new("Appointment booked successfully", appointment))
    }

    /// Appointments where the caller is donor or recipient.
    pub async fn list_mine(&self, ctx: &RequestContext) -> AppResult<Vec<Appointment>> {
        self.appointments.find_by_user(ctx.user_id).await
    }

    /// The attendee confirms they will attend. Status is unaffected.
    pub async fn confirm(
        &self,
        ctx: &RequestContext,
        id: AppointmentId,
    ) -> AppResult<Outcome<Appointment>> {
        let appointment = lookup::appointment(self.appointments.as_ref(), id).await?;
        if !appointment.is_attendee(ctx.user_id) {
            return Err(AppError::authorization(
                "Only an attendee can confirm this appointment",
            ));
        }
        if appointment.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Appointment is already {}",
                appointment.status
            )));
        }
        let confirmed = self
            .appointments
            .set_confirmed(id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;
        Ok(Outcome::new("Attendance confirmed", confirmed))
    }

    /// The attendee cancels, or the donor reports the donation done.
    pub async fn attendee_update(
        &self,
        ctx: &RequestContext,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> AppResult<Outcome<AppointmentUpdate>> {
        let appointment = lookup::appointment(self.appointments.as_ref(), id).await?;
        if !appointment.is_attendee(ctx.user_id) {
            return Err(AppError::authorization(
                "Only an attendee can update this appointment",
            ));
        }
        ensure_open(&appointment)?;

        match status {
            AppointmentStatus::Cancelled => {
                let cancelled = self.move_to(&appointment, status, None).await?;
                info!(appointment_id = %id, actor_id = %ctx.user_id, "Appointment cancelled");
                Ok(Outcome::new(
                    "Appointment cancelled",
                    AppointmentUpdate::status_only(cancelled),
                ))
            }
            AppointmentStatus::Donated => {
                if appointment.donor_id != ctx.user_id {
                    return Err(AppError::authorization(
                        "Only the donor can report a donation",
                    ));
                }
                let recorded = self
                    .recorder
                    .record_appointment(
                        &appointment,
                        DonationActor {
                            actor_id: ctx.user_id,
                            action: actions::DONATION_COMPLETED,
                            verification: None,
                            notes: None,
                        },
                    )
                    .await?;
                Ok(Outcome::new(
                    "Appointment marked as donated",
                    AppointmentUpdate::donated(recorded)?,
                ))
            }
            other => Err(AppError::validation(format!(
                "Attendees may only mark an appointment cancelled or donated, not {other}"
            ))),
        }
    }

    /// Hospital staff verify the outcome: `donated` or `missed`.
    pub async fn staff_verify(
        &self,
        ctx: &RequestContext,
        id: AppointmentId,
        status: AppointmentStatus,
        notes: Option<String>,
    ) -> AppResult<Outcome<AppointmentUpdate>> {
        ctx.require_role(&[UserRole::HospitalStaff])?;
        let hospital_id = ctx.require_hospital()?;
        if !status.requires_verification() {
            return Err(AppError::validation(
                "Invalid status. Must be 'donated' or 'missed'",
            ));
        }
        let appointment = lookup::appointment(self.appointments.as_ref(), id).await?;
        if appointment.hospital_id != hospital_id {
            return Err(AppError::authorization(
                "Staff can only manage appointments for their hospital",
            ));
        }
        ensure_open(&appointment)?;

        let verification = Verification {
            verified_by: ctx.user_id,
            hospital_id,
            verified_at: Utc::now(),
        };
        self.apply_verified(
            &appointment,
            status,
            verification,
            notes,
            actions::APPOINTMENT_VERIFIED,
        )
        .await
    }

    /// The hospital account moves an appointment along any valid transition.
    pub async fn hospital_update_status(
        &self,
        ctx: &RequestContext,
        id: AppointmentId,
        status: AppointmentStatus,
        notes: Option<String>,
    ) -> AppResult<Outcome<AppointmentUpdate>> {
        ctx.require_role(&[UserRole::Hospital, UserRole::HospitalStaff])?;
        let hospital_id = ctx.require_hospital()?;
        let appointment = lookup::appointment(self.appointments.as_ref(), id).await?;
        if appointment.hospital_id != hospital_id {
            return Err(AppError::authorization(
                "Access denied. Appointment not for your hospital.",
            ));
        }
        if !appointment.status.can_transition_to(status) {
            return Err(AppError::conflict(format!(
                "Cannot move appointment from {} to {}",
                appointment.status, status
            )));
        }

        if status.requires_verification() {
            let verification = Verification {
                verified_by: ctx.user_id,
                hospital_id,
                verified_at: Utc::now(),
            };
            let action = match status {
                AppointmentStatus::Donated => actions::DONATION_COMPLETED,
                _ => actions::APPOINTMENT_STATUS_UPDATED,
            };
            return self
                .apply_verified(&appointment, status, verification, notes, action)
                .await;
        }

        let updated = self.move_to(&appointment, status, None).await?;
        self.audit_best_effort(CreateAuditLogEntry::new(
            ctx.user_id,
            actions::APPOINTMENT_STATUS_UPDATED,
            targets::APPOINTMENT,
            Some(id.into_uuid()),
            json!({ "from": appointment.status, "to": status, "notes": notes }),
        ))
        .await;
        info!(appointment_id = %id, status = %status, "Appointment status updated by hospital");
        Ok(Outcome::new(
            format!("Appointment marked as {status}"),
            AppointmentUpdate::status_only(updated),
        ))
    }

    /// Appointments hosted by the caller's hospital.
    pub async fn hospital_list(&self, ctx: &RequestContext) -> AppResult<Vec<Appointment>> {
        let hospital_id = ctx.require_hospital()?;
        self.appointments.find_by_hospital(hospital_id).await
    }

    /// Scheduled appointments at the caller's hospital from today on.
    pub async fn staff_upcoming(&self, ctx: &RequestContext) -> AppResult<Vec<Appointment>> {
        let hospital_id = ctx.require_hospital()?;
        let now = Utc::now();
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        self.appointments
            .find_upcoming_by_hospital(hospital_id, today)
            .await
    }

    async fn apply_verified(
        &self,
        appointment: &Appointment,
        status: AppointmentStatus,
        verification: Verification,
        notes: Option<String>,
        action: &'static str,
    ) -> AppResult<Outcome<AppointmentUpdate>> {
        let actor_id = verification.verified_by;
        if status == AppointmentStatus::Donated {
            let recorded = self
                .recorder
                .record_appointment(
                    appointment,
                    DonationActor {
                        actor_id,
                        action,
                        verification: Some(verification),
                        notes,
                    },
                )
                .await?;
            let donor = &recorded.donor;
            self.dispatcher
                .record(
                    NewNotification::new(
                        actor_id,
                        NotificationKind::DonationVerified,
                        "Donation Verified",
                        format!(
                            "Donation from {} ({}) has been verified and inventory updated.",
                            donor.display_name(),
                            recorded.receipt.donation.blood_group
                        ),
                    )
                    .hospital(appointment.hospital_name.clone())
                    .appointment(appointment.id),
                )
                .await;
            return Ok(Outcome::new(
                "Appointment marked as donated",
                AppointmentUpdate::donated(recorded)?,
            ));
        }

        let missed = self
            .move_to(appointment, AppointmentStatus::Missed, Some(verification))
            .await?;
        info!(
            appointment_id = %appointment.id,
            verified_by = %actor_id,
            "Appointment marked as missed"
        );
        self.dispatcher
            .record(
                NewNotification::new(
                    actor_id,
                    NotificationKind::AppointmentMissed,
                    "Missed Appointment",
                    "Appointment was marked as missed. Donor did not show up.",
                )
                .hospital(appointment.hospital_name.clone())
                .appointment(appointment.id),
            )
            .await;
        Ok(Outcome::new(
            "Appointment marked as missed",
            AppointmentUpdate::status_only(missed),
        ))
    }

    async fn move_to(
        &self,
        appointment: &Appointment,
        status: AppointmentStatus,
        verification: Option<Verification>,
    ) -> AppResult<Appointment> {
        self.appointments
            .transition(
                appointment.id,
                &AppointmentStatus::allowed_sources(status),
                status,
                verification,
            )
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "Appointment can no longer move to {status}"
                ))
            })
    }

    async fn audit_best_effort(&self, entry: CreateAuditLogEntry) {
        if let Err(e) = self.audit.append(&entry).await {
            warn!(action = %entry.action, error = %e, "Failed to write audit entry");
        }
    }
}

fn ensure_open(appointment: &Appointment) -> AppResult<()> {
    if appointment.status.is_terminal() {
        Err(AppError::conflict(format!(
            "Appointment is already {}",
            appointment.status
        )))
    } else {
        Ok(())
    }
}
