//! Blood request intake, listing, direct accept and cancellation.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use lifeshare_core::config::{LifecycleConfig, NotificationsConfig};
use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, Outcome, RequestId};
use lifeshare_database::store::{
    HospitalStore, MatchCommit, MatchKind, MatchStore, RequestStore, UserStore,
};
use lifeshare_entity::appointment::CreateAppointment;
use lifeshare_entity::blood::BloodGroup;
use lifeshare_entity::notification::{NewNotification, NotificationKind};
use lifeshare_entity::request::{
    BloodRequest, CreateBloodRequest, RequestDetails, RequestStatus, Urgency,
};
use lifeshare_entity::user::UserRole;

use super::MatchResult;
use crate::context::RequestContext;
use crate::lookup;
use crate::matching::MatchingService;
use crate::notification::NotificationDispatcher;

/// Input for a new blood request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBloodRequest {
    pub blood_group: BloodGroup,
    /// Defaults to one when the request is matched.
    pub units_needed: Option<i32>,
    #[serde(default)]
    pub urgency: Urgency,
    /// Hospital where the blood is needed.
    pub hospital_id: HospitalId,
    #[serde(default, flatten)]
    pub details: RequestDetails,
}

/// Blood request intake and the direct-accept path.
#[derive(Debug, Clone)]
pub struct RequestService {
    requests: Arc<dyn RequestStore>,
    hospitals: Arc<dyn HospitalStore>,
    users: Arc<dyn UserStore>,
    matches: Arc<dyn MatchStore>,
    dispatcher: NotificationDispatcher,
    matching: MatchingService,
    notify_donors_on_create: bool,
    feed_limit: i64,
}

impl RequestService {
    /// Creates a new request service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requests: Arc<dyn RequestStore>,
        hospitals: Arc<dyn HospitalStore>,
        users: Arc<dyn UserStore>,
        matches: Arc<dyn MatchStore>,
        dispatcher: NotificationDispatcher,
        matching: MatchingService,
        notifications: &NotificationsConfig,
        lifecycle: &LifecycleConfig,
    ) -> Self {
        Self {
            requests,
            hospitals,
            users,
            matches,
            dispatcher,
            matching,
            notify_donors_on_create: notifications.notify_donors_on_create,
            feed_limit: lifecycle.donor_request_feed_limit,
        }
    }

    /// Create a request for the calling recipient.
    ///
    /// The hospital is resolved once here and stored by reference with its
    /// name and address copied alongside. Matching donors are notified in
    /// the background when enabled.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: NewBloodRequest,
    ) -> AppResult<Outcome<BloodRequest>> {
        ctx.require_role(&[UserRole::Recipient])?;
        if input.units_needed.is_some_and(|units| units < 1) {
            return Err(AppError::validation("units_needed must be at least 1"));
        }
        let hospital = self
            .hospitals
            .find_by_id(input.hospital_id)
            .await?
            .ok_or_else(|| AppError::unresolved("Hospital not found for the request"))?;

        let request = self
            .requests
            .create(&CreateBloodRequest {
                recipient_id: ctx.user_id,
                blood_group: input.blood_group,
                units_needed: input.units_needed,
                urgency: input.urgency,
                hospital_id: hospital.id,
                hospital_name: hospital.name,
                hospital_address: hospital.address,
                details: input.details,
            })
            .await?;

        info!(
            request_id = %request.id,
            recipient_id = %request.recipient_id,
            blood_group = %request.blood_group,
            urgency = %request.urgency,
            "Blood request created"
        );

        if self.notify_donors_on_create {
            self.matching.spawn_for(request.clone());
        }
        Ok(Outcome::new("Request created", request))
    }

    /// Fetch one request.
    pub async fn get(&self, _ctx: &RequestContext, id: RequestId) -> AppResult<BloodRequest> {
        lookup::request(self.requests.as_ref(), id).await
    }

    /// Requests raised by the caller, newest first.
    pub async fn list_mine(&self, ctx: &RequestContext) -> AppResult<Vec<BloodRequest>> {
        self.requests.find_by_recipient(ctx.user_id).await
    }

    /// All pending requests, newest first.
    pub async fn list_pending(&self) -> AppResult<Vec<BloodRequest>> {
        self.requests.find_by_status(&[RequestStatus::Pending]).await
    }

    /// Pending requests for the calling donor's exact blood group.
    pub async fn donor_feed(&self, ctx: &RequestContext) -> AppResult<Vec<BloodRequest>> {
        ctx.require_role(&[UserRole::Donor])?;
        let donor = lookup::user(self.users.as_ref(), ctx.user_id).await?;
        let group = donor
            .blood_group
            .ok_or_else(|| AppError::validation("Donor blood group is not set"))?;
        self.requests
            .find_pending_by_blood_group(group, self.feed_limit)
            .await
    }

    /// The calling donor accepts a pending request directly.
    ///
    /// Binds the donor, moves the request to `accepted` with both
    /// acknowledgement flags accepted, and schedules an appointment, all in
    /// one commit guarded on the request still being pending.
    pub async fn accept(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
    ) -> AppResult<Outcome<MatchResult>> {
        ctx.require_role(&[UserRole::Donor])?;
        let request = lookup::request(self.requests.as_ref(), request_id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::conflict("Request is not in pending status"));
        }
        let donor = lookup::user(self.users.as_ref(), ctx.user_id).await?;
        if donor.role != UserRole::Donor {
            return Err(AppError::authorization("Only donors can accept requests"));
        }
        let hospital = lookup::hospital_for(self.hospitals.as_ref(), &request).await?;

        let commit = MatchCommit {
            request_id,
            donor_id: donor.id,
            kind: MatchKind::Direct,
            appointment: CreateAppointment {
                donor_id: donor.id,
                recipient_id: Some(request.recipient_id),
                request_id: Some(request.id),
                appointment_date: request.appointment_date(Utc::now()),
                appointment_time: None,
                hospital_id: hospital.id,
                hospital_name: hospital.name.clone(),
                hospital_address: hospital.address.clone(),
                notes: None,
            },
        };
        let committed = self
            .matches
            .commit_match(&commit)
            .await?
            .ok_or_else(|| AppError::conflict("Request is no longer pending"))?;

        info!(
            request_id = %request_id,
            donor_id = %donor.id,
            appointment_id = %committed.appointment.id,
            "Request accepted directly by donor"
        );

        let appointment = &committed.appointment;
        self.dispatcher
            .record_all([
                NewNotification::new(
                    request.recipient_id,
                    NotificationKind::DonorAccepted,
                    "Donor Found!",
                    format!(
                        "{} has accepted your blood request and an appointment has been scheduled.",
                        donor.display_name()
                    ),
                )
                .hospital(hospital.name.clone())
                .appointment_time(appointment.appointment_time.clone())
                .patient(request.details.patient_name.clone())
                .request(request.id)
                .appointment(appointment.id),
                NewNotification::new(
                    donor.id,
                    NotificationKind::RequestAccepted,
                    "Request Accepted",
                    format!(
                        "You have accepted the blood request. An appointment has been scheduled at {}.",
                        hospital.name
                    ),
                )
                .hospital(hospital.name.clone())
                .patient(request.details.patient_name.clone())
                .request(request.id)
                .appointment(appointment.id),
            ])
            .await;

        Ok(Outcome::new(
            "Request accepted and appointment scheduled",
            MatchResult::from(committed),
        ))
    }

    /// Cancel a request that is not yet completed or cancelled, closing its
    /// open appointments with it.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
    ) -> AppResult<Outcome<BloodRequest>> {
        let request = lookup::request(self.requests.as_ref(), request_id).await?;
        if !request.is_owned_by(ctx.user_id) && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only the requesting recipient can cancel this request",
            ));
        }
        if request.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Request is already {}",
                request.status
            )));
        }
        let cancelled = self
            .requests
            .cancel(request_id, &RequestStatus::CANCELLABLE)
            .await?
            .ok_or_else(|| AppError::conflict("Request changed state; cancel again"))?;

        info!(
            request_id = %request_id,
            actor_id = %ctx.user_id,
            closed_appointments = cancelled.closed_appointments,
            "Blood request cancelled"
        );
        Ok(Outcome::new("Request cancelled", cancelled.request))
    }
}
