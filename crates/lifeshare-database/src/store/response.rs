//! Donor response persistence.

use async_trait::async_trait;

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{RequestId, ResponseId, UserId};
use lifeshare_entity::response::{DonorResponse, ResponseStatus};

/// Persistence operations on donor responses.
#[async_trait]
pub trait ResponseStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a pending response. A second response by the same donor to the
    /// same request fails with a conflict.
    async fn create(&self, donor_id: UserId, request_id: RequestId) -> AppResult<DonorResponse>;

    /// Find a response by primary key.
    async fn find_by_id(&self, id: ResponseId) -> AppResult<Option<DonorResponse>>;

    /// Find the response of a donor to a request.
    async fn find_by_donor_and_request(
        &self,
        donor_id: UserId,
        request_id: RequestId,
    ) -> AppResult<Option<DonorResponse>>;

    /// Responses to one request, oldest first.
    async fn find_by_request(&self, request_id: RequestId) -> AppResult<Vec<DonorResponse>>;

    /// Responses to any request raised by the recipient, newest first.
    async fn find_for_recipient(&self, recipient_id: UserId) -> AppResult<Vec<DonorResponse>>;

    /// Responses with the given status, newest first.
    async fn find_by_status(&self, status: ResponseStatus) -> AppResult<Vec<DonorResponse>>;

    /// Move a response to `to` if it is still in `from`.
    async fn transition(
        &self,
        id: ResponseId,
        from: ResponseStatus,
        to: ResponseStatus,
    ) -> AppResult<Option<DonorResponse>>;
}
