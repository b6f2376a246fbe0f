//! Donor responses and the response-mediated match.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{Outcome, RequestId, ResponseId};
use lifeshare_database::store::{
    HospitalStore, MatchCommit, MatchKind, MatchStore, RequestStore, ResponseStore, UserStore,
};
use lifeshare_entity::appointment::CreateAppointment;
use lifeshare_entity::notification::{NewNotification, NotificationKind};
use lifeshare_entity::request::{BloodRequest, RequestStatus};
use lifeshare_entity::response::{DonorResponse, ResponseStatus};
use lifeshare_entity::user::UserRole;

use super::MatchResult;
use crate::context::RequestContext;
use crate::lookup;
use crate::notification::NotificationDispatcher;

/// Donor replies to requests, and the recipient's decision on them.
#[derive(Debug, Clone)]
pub struct ResponseService {
    responses: Arc<dyn ResponseStore>,
    requests: Arc<dyn RequestStore>,
    hospitals: Arc<dyn HospitalStore>,
    users: Arc<dyn UserStore>,
    matches: Arc<dyn MatchStore>,
    dispatcher: NotificationDispatcher,
}

/// Outcome of deciding on a response.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum ResponseDecision {
    /// The response won the request.
    Matched(Box<MatchResult>),
    /// Only the response itself changed.
    Declined(DonorResponse),
}

impl ResponseService {
    /// Creates a new response service.
    pub fn new(
        responses: Arc<dyn ResponseStore>,
        requests: Arc<dyn RequestStore>,
        hospitals: Arc<dyn HospitalStore>,
        users: Arc<dyn UserStore>,
        matches: Arc<dyn MatchStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            responses,
            requests,
            hospitals,
            users,
            matches,
            dispatcher,
        }
    }

    /// The calling donor responds to a pending request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
    ) -> AppResult<Outcome<DonorResponse>> {
        ctx.require_role(&[UserRole::Donor])?;
        let request = lookup::request(self.requests.as_ref(), request_id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::conflict("Request is not in pending status"));
        }
        if self
            .responses
            .find_by_donor_and_request(ctx.user_id, request_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "You have already responded to this request",
            ));
        }
        let donor = lookup::user(self.users.as_ref(), ctx.user_id).await?;
        let response = self.responses.create(donor.id, request_id).await?;

        info!(
            response_id = %response.id,
            request_id = %request_id,
            donor_id = %donor.id,
            "Donor response recorded"
        );

        self.dispatcher
            .record(
                NewNotification::new(
                    request.recipient_id,
                    NotificationKind::DonorResponded,
                    "New Donor Response",
                    format!("{} has responded to your blood request.", donor.display_name()),
                )
                .hospital(request.hospital_name.clone())
                .patient(request.details.patient_name.clone())
                .request(request.id),
            )
            .await;

        Ok(Outcome::new("Response recorded successfully", response))
    }

    /// Responses to the caller's requests, newest first.
    pub async fn list_mine(&self, ctx: &RequestContext) -> AppResult<Vec<DonorResponse>> {
        self.responses.find_for_recipient(ctx.user_id).await
    }

    /// Accept or decline a response.
    ///
    /// Only `accepted` and `declined` are valid decisions. Declining touches
    /// the response alone. Accepting binds the donor, moves the request to
    /// `matched`, declines every other pending response and schedules the
    /// appointment in one commit; if the request or the response moved on
    /// first, nothing is written and the caller gets a conflict.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        response_id: ResponseId,
        decision: &str,
    ) -> AppResult<Outcome<ResponseDecision>> {
        let decision = ResponseStatus::parse_decision(decision)?;
        let response = self
            .responses
            .find_by_id(response_id)
            .await?
            .ok_or_else(|| AppError::not_found("Response not found"))?;
        let request = lookup::request(self.requests.as_ref(), response.request_id).await?;
        if !request.is_owned_by(ctx.user_id) && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only the requesting recipient can decide on responses",
            ));
        }
        if response.status != ResponseStatus::Pending {
            return Err(AppError::conflict(format!(
                "Response has already been {}",
                response.status
            )));
        }

        match decision {
            ResponseStatus::Accepted => self.accept(response, request).await,
            _ => {
                let declined = self
                    .responses
                    .transition(response_id, ResponseStatus::Pending, ResponseStatus::Declined)
                    .await?
                    .ok_or_else(|| AppError::conflict("Response is no longer pending"))?;
                info!(response_id = %response_id, "Donor response declined");
                Ok(Outcome::new(
                    "Response declined",
                    ResponseDecision::Declined(declined),
                ))
            }
        }
    }

    async fn accept(
        &self,
        response: DonorResponse,
        request: BloodRequest,
    ) -> AppResult<Outcome<ResponseDecision>> {
        if request.status != RequestStatus::Pending {
            return Err(AppError::conflict("Request is not in pending status"));
        }
        let donor = lookup::user(self.users.as_ref(), response.donor_id).await?;
        let hospital = lookup::hospital_for(self.hospitals.as_ref(), &request).await?;

        let commit = MatchCommit {
            request_id: request.id,
            donor_id: donor.id,
            kind: MatchKind::Response(response.id),
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
            .ok_or_else(|| AppError::conflict("Request or response is no longer pending"))?;

        info!(
            request_id = %request.id,
            response_id = %response.id,
            donor_id = %donor.id,
            declined = committed.declined_responses,
            "Donor response accepted; request matched"
        );

        self.dispatcher
            .record(
                NewNotification::new(
                    request.recipient_id,
                    NotificationKind::ResponseAccepted,
                    "Donor Response Accepted",
                    format!("{} has accepted your blood request.", donor.display_name()),
                )
                .hospital(hospital.name.clone())
                .appointment_time(committed.appointment.appointment_time.clone())
                .patient(request.details.patient_name.clone())
                .request(request.id)
                .appointment(committed.appointment.id),
            )
            .await;

        Ok(Outcome::new(
            "Response accepted and appointment scheduled",
            ResponseDecision::Matched(Box::new(MatchResult::from(committed))),
        ))
    }
}
