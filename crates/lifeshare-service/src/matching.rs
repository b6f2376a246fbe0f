//! Matching engine: tell every donor of the requested group about a request.
//!
//! Matching only informs. It never reserves a donor or changes the request.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{MailMessage, MailTemplate};
use lifeshare_core::types::{Outcome, RequestId};
use lifeshare_database::store::{RequestStore, UserStore};
use lifeshare_entity::request::BloodRequest;
use lifeshare_mail::BloodRequestPayload;

use crate::context::RequestContext;
use crate::lookup;
use crate::notification::NotificationDispatcher;

/// Aggregate result of one matching run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Donors whose email the provider accepted.
    pub notified_count: usize,
    /// Donors with exactly the requested blood group.
    pub total_matching_donors: usize,
    /// Donors whose email failed.
    pub failed_count: usize,
}

/// Finds donors with the requested blood group and emails them.
#[derive(Debug, Clone)]
pub struct MatchingService {
    users: Arc<dyn UserStore>,
    requests: Arc<dyn RequestStore>,
    dispatcher: NotificationDispatcher,
}

impl MatchingService {
    /// Creates a new matching service.
    pub fn new(
        users: Arc<dyn UserStore>,
        requests: Arc<dyn RequestStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            users,
            requests,
            dispatcher,
        }
    }

    /// Email every donor whose blood group equals the request's exactly.
    ///
    /// No compatible-group expansion is applied. Zero matching donors is a
    /// successful run with nothing sent.
    pub async fn notify_matching_donors(&self, request: &BloodRequest) -> AppResult<MatchReport> {
        let donors = self
            .users
            .find_donors_by_blood_group(request.blood_group)
            .await?;

        if donors.is_empty() {
            info!(
                request_id = %request.id,
                blood_group = %request.blood_group,
                "No matching donors for request"
            );
            return Ok(MatchReport::default());
        }

        let payload = serde_json::to_value(BloodRequestPayload {
            blood_group: request.blood_group.to_string(),
            units_needed: request.effective_units(),
            urgency: request.urgency.to_string(),
            hospital_name: request.hospital_name.clone(),
            hospital_address: request.hospital_address.clone(),
            patient_name: request.details.patient_name.clone(),
            required_date: request.details.required_date,
        })?;
        let messages = donors
            .iter()
            .map(|donor| {
                MailMessage::new(
                    donor.email.clone(),
                    donor.display_name(),
                    MailTemplate::BloodRequest,
                    payload.clone(),
                )
            })
            .collect();

        let sent = self.dispatcher.fan_out(messages).await;
        let report = MatchReport {
            notified_count: sent.delivered(),
            total_matching_donors: donors.len(),
            failed_count: sent.failed(),
        };
        info!(
            request_id = %request.id,
            blood_group = %request.blood_group,
            notified = report.notified_count,
            failed = report.failed_count,
            total = report.total_matching_donors,
            "Donor matching finished"
        );
        Ok(report)
    }

    /// Run matching in the background so the caller is not held up.
    pub fn spawn_for(&self, request: BloodRequest) -> JoinHandle<Option<MatchReport>> {
        let matching = self.clone();
        tokio::spawn(async move {
            match matching.notify_matching_donors(&request).await {
                Ok(report) => Some(report),
                Err(e) => {
                    error!(request_id = %request.id, error = %e, "Donor matching failed");
                    None
                }
            }
        })
    }

    /// Re-run matching for a stored request (admin).
    pub async fn notify_for_request(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
    ) -> AppResult<Outcome<MatchReport>> {
        ctx.require_admin()?;
        let request = lookup::request(self.requests.as_ref(), request_id).await?;
        let report = self.notify_matching_donors(&request).await?;
        Ok(Outcome::new(
            format!(
                "Notified {} of {} matching donors",
                report.notified_count, report.total_matching_donors
            ),
            report,
        ))
    }
}
