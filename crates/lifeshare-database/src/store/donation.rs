//! Donation history persistence. Appends happen in
//! [`DonationLedgerStore`](super::DonationLedgerStore).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::UserId;
use lifeshare_entity::donation::Donation;

/// Read operations on the donation ledger.
#[async_trait]
pub trait DonationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Donations by a donor, newest first.
    async fn find_by_donor(&self, donor_id: UserId) -> AppResult<Vec<Donation>>;

    /// Number of donations by a donor.
    async fn count_by_donor(&self, donor_id: UserId) -> AppResult<i64>;

    /// Number of donations dated at or after `since`, or of all donations
    /// when `None`.
    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<i64>;

    /// Most recent donation by a donor.
    async fn latest_by_donor(&self, donor_id: UserId) -> AppResult<Option<Donation>>;
}
