//! Blood request persistence.

use async_trait::async_trait;

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, RequestId, UserId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::request::{BloodRequest, CreateBloodRequest, RequestStatus};

/// A cancelled request and how many of its appointments were closed with it.
#[derive(Debug, Clone)]
pub struct CancelledRequest {
    pub request: BloodRequest,
    pub closed_appointments: u64,
}

/// Persistence operations on blood requests.
///
/// Moves out of `pending` into `accepted`/`matched` happen only through
/// [`MatchStore`](super::MatchStore); completion only through
/// [`DonationLedgerStore`](super::DonationLedgerStore).
#[async_trait]
pub trait RequestStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a request in `pending`.
    async fn create(&self, input: &CreateBloodRequest) -> AppResult<BloodRequest>;

    /// Find a request by primary key.
    async fn find_by_id(&self, id: RequestId) -> AppResult<Option<BloodRequest>>;

    /// Requests raised by a recipient, newest first.
    async fn find_by_recipient(&self, recipient_id: UserId) -> AppResult<Vec<BloodRequest>>;

    /// Requests in any of `statuses`, newest first.
    async fn find_by_status(&self, statuses: &[RequestStatus]) -> AppResult<Vec<BloodRequest>>;

    /// Pending requests for one blood group, newest first, at most `limit`.
    async fn find_pending_by_blood_group(
        &self,
        group: BloodGroup,
        limit: i64,
    ) -> AppResult<Vec<BloodRequest>>;

    /// Requests at a hospital in any of `statuses`, newest first.
    async fn find_by_hospital(
        &self,
        hospital_id: HospitalId,
        statuses: &[RequestStatus],
    ) -> AppResult<Vec<BloodRequest>>;

    /// Completed requests, most recently updated first, at most `limit`.
    async fn find_completed(&self, limit: i64) -> AppResult<Vec<BloodRequest>>;

    /// Cancel a request whose status is one of `from`, moving its still-open
    /// appointments to `cancelled` in the same commit.
    async fn cancel(
        &self,
        id: RequestId,
        from: &[RequestStatus],
    ) -> AppResult<Option<CancelledRequest>>;
}
