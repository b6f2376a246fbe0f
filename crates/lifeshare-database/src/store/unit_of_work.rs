//! Multi-entity commits that must land together or not at all.

use async_trait::async_trait;

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AppointmentId, RequestId, ResponseId, UserId};
use lifeshare_entity::appointment::{
    Appointment, AppointmentStatus, CreateAppointment, Verification,
};
use lifeshare_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use lifeshare_entity::donation::{CreateDonation, Donation};
use lifeshare_entity::inventory::{InventoryUnit, StockKey};
use lifeshare_entity::request::{BloodRequest, RequestStatus};
use lifeshare_entity::response::DonorResponse;

/// How a donor gets bound to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The donor accepted the request itself. Request goes to `accepted` and
    /// both acknowledgement flags to `accepted`.
    Direct,
    /// The recipient accepted this response. Request goes to `matched`, unset
    /// units default to one, legacy `urgent` becomes `critical`, the response
    /// is accepted and its pending siblings declined.
    Response(ResponseId),
}

impl MatchKind {
    /// Request status after the commit.
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Self::Direct => RequestStatus::Accepted,
            Self::Response(_) => RequestStatus::Matched,
        }
    }
}

/// Everything written when a donor is bound to a pending request.
#[derive(Debug, Clone)]
pub struct MatchCommit {
    pub request_id: RequestId,
    pub donor_id: UserId,
    pub kind: MatchKind,
    pub appointment: CreateAppointment,
}

/// Result of a successful [`MatchCommit`].
#[derive(Debug, Clone)]
pub struct CommittedMatch {
    pub request: BloodRequest,
    pub appointment: Appointment,
    /// The accepted response, for response-mediated matches.
    pub response: Option<DonorResponse>,
    /// Sibling responses moved from `pending` to `declined`.
    pub declined_responses: u64,
}

/// Binds donors to requests.
#[async_trait]
pub trait MatchStore: Send + Sync + std::fmt::Debug + 'static {
    /// Commit a match in one transaction.
    ///
    /// Returns `None` without writing anything when the request is no longer
    /// `pending` or, for response matches, the response is no longer `pending`.
    async fn commit_match(&self, commit: &MatchCommit) -> AppResult<Option<CommittedMatch>>;
}

/// Appointment move that triggers a donation.
#[derive(Debug, Clone)]
pub struct AppointmentTransition {
    pub appointment_id: AppointmentId,
    /// Statuses the appointment may currently be in.
    pub from: Vec<AppointmentStatus>,
    /// Staff stamp, for staff-driven moves.
    pub verification: Option<Verification>,
}

/// Request completion that accompanies a donation.
#[derive(Debug, Clone, Copy)]
pub struct RequestCompletion {
    pub request_id: RequestId,
    /// When set, a request that is no longer `accepted`/`matched`, or is bound
    /// to a donor other than the donation's, aborts the whole commit.
    /// Otherwise the completion step is skipped.
    pub required: bool,
}

/// Everything written when blood is given.
#[derive(Debug, Clone)]
pub struct DonationCommit {
    pub appointment: Option<AppointmentTransition>,
    pub stock: StockKey,
    pub units: i32,
    pub donation: CreateDonation,
    pub request: Option<RequestCompletion>,
    pub audit: CreateAuditLogEntry,
}

/// Result of a successful [`DonationCommit`].
#[derive(Debug, Clone)]
pub struct DonationReceipt {
    pub appointment: Option<Appointment>,
    pub inventory: InventoryUnit,
    pub donation: Donation,
    /// The completed request, when completion ran.
    pub request: Option<BloodRequest>,
    pub audit: AuditLogEntry,
}

/// Records donations.
#[async_trait]
pub trait DonationLedgerStore: Send + Sync + std::fmt::Debug + 'static {
    /// Commit a donation in one transaction, in this order: appointment
    /// transition, inventory credit, donation append, donor
    /// `last_donation_date`, request completion (closing the same donor's
    /// other open appointments on the request as `donated`), audit entry.
    ///
    /// Returns `None` without writing anything when the appointment guard or a
    /// required request guard fails.
    async fn commit_donation(&self, commit: &DonationCommit) -> AppResult<Option<DonationReceipt>>;
}
