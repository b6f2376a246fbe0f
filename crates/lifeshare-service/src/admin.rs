//! Admin read models: dashboard counts and matched donors.
//!
//! Matches are exposed two ways: from accepted responses and from requests
//! in `matched` status. The two overlap for response-mediated matches and
//! are kept separate rather than merged.

use std::sync::Arc;

use chrono::NaiveTime;
use serde::Serialize;

use lifeshare_core::result::AppResult;
use lifeshare_database::store::{
    DonationStore, InventoryStore, RequestStore, ResponseStore, UserStore,
};
use lifeshare_entity::inventory::{InventoryKind, StockLevel};
use lifeshare_entity::request::{BloodRequest, RequestStatus};
use lifeshare_entity::response::{DonorResponse, ResponseStatus};
use lifeshare_entity::user::UserRole;

use crate::context::RequestContext;

/// An accepted response with the request it answered.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseMatch {
    pub response: DonorResponse,
    /// Absent when the request has since been removed.
    pub request: Option<BloodRequest>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_donors: i64,
    pub total_recipients: i64,
    pub total_donations: i64,
    pub pending_requests: i64,
    /// Donations dated since midnight UTC of the request time.
    pub today_donations: i64,
    pub total_plasma_units: i64,
    /// Plasma rows below the low-stock threshold.
    pub plasma_stock_alerts: i64,
}

/// Read-only views for administrators.
#[derive(Debug, Clone)]
pub struct AdminReadModels {
    users: Arc<dyn UserStore>,
    requests: Arc<dyn RequestStore>,
    responses: Arc<dyn ResponseStore>,
    donations: Arc<dyn DonationStore>,
    inventory: Arc<dyn InventoryStore>,
    completed_limit: i64,
    low_stock_threshold: i32,
}

impl AdminReadModels {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        requests: Arc<dyn RequestStore>,
        responses: Arc<dyn ResponseStore>,
        donations: Arc<dyn DonationStore>,
        inventory: Arc<dyn InventoryStore>,
        completed_limit: i64,
        low_stock_threshold: i32,
    ) -> Self {
        Self {
            users,
            requests,
            responses,
            donations,
            inventory,
            completed_limit,
            low_stock_threshold,
        }
    }

    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<AdminStats> {
        ctx.require_admin()?;
        let midnight = ctx
            .request_time
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        let plasma = self.inventory.find_all(InventoryKind::Plasma).await?;

        Ok(AdminStats {
            total_users: self.users.count_by_role(None).await?,
            total_donors: self.users.count_by_role(Some(UserRole::Donor)).await?,
            total_recipients: self.users.count_by_role(Some(UserRole::Recipient)).await?,
            total_donations: self.donations.count_since(None).await?,
            pending_requests: self
                .requests
                .find_by_status(&[RequestStatus::Pending])
                .await?
                .len() as i64,
            today_donations: self.donations.count_since(Some(midnight)).await?,
            total_plasma_units: plasma.iter().map(|u| i64::from(u.units_available)).sum(),
            plasma_stock_alerts: plasma
                .iter()
                .filter(|u| u.level(self.low_stock_threshold) == StockLevel::Low)
                .count() as i64,
        })
    }

    /// Accepted responses joined with their requests.
    pub async fn matches_from_responses(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<ResponseMatch>> {
        ctx.require_admin()?;
        let accepted = self.responses.find_by_status(ResponseStatus::Accepted).await?;
        let mut matches = Vec::with_capacity(accepted.len());
        for response in accepted {
            let request = self.requests.find_by_id(response.request_id).await?;
            matches.push(ResponseMatch { response, request });
        }
        Ok(matches)
    }

    /// Requests in `matched` status.
    pub async fn matches_from_requests(&self, ctx: &RequestContext) -> AppResult<Vec<BloodRequest>> {
        ctx.require_admin()?;
        self.requests.find_by_status(&[RequestStatus::Matched]).await
    }

    /// The most recently completed requests.
    pub async fn completed_matches(&self, ctx: &RequestContext) -> AppResult<Vec<BloodRequest>> {
        ctx.require_admin()?;
        self.requests.find_completed(self.completed_limit).await
    }
}
