//! Donor response entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{RequestId, ResponseId, UserId};

use super::status::ResponseStatus;

/// A donor's reply to a specific blood request. At most one per (donor, request).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DonorResponse {
    /// Unique response identifier.
    pub id: ResponseId,
    /// The responding donor.
    pub donor_id: UserId,
    /// The request responded to.
    pub request_id: RequestId,
    /// Current status.
    pub status: ResponseStatus,
    /// When the response was created.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}
