//! Donation history for the calling donor.

use std::sync::Arc;

use lifeshare_core::result::AppResult;
use lifeshare_database::store::DonationStore;
use lifeshare_entity::donation::Donation;

use crate::context::RequestContext;

/// Read access to the donation log.
#[derive(Debug, Clone)]
pub struct DonationService {
    donations: Arc<dyn DonationStore>,
}

impl DonationService {
    pub fn new(donations: Arc<dyn DonationStore>) -> Self {
        Self { donations }
    }

    /// The caller's donations, newest first.
    pub async fn history(&self, ctx: &RequestContext) -> AppResult<Vec<Donation>> {
        self.donations.find_by_donor(ctx.user_id).await
    }

    pub async fn count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.donations.count_by_donor(ctx.user_id).await
    }

    pub async fn latest(&self, ctx: &RequestContext) -> AppResult<Option<Donation>> {
        self.donations.latest_by_donor(ctx.user_id).await
    }
}
