//! The request-to-donation lifecycle.
//!
//! A blood request is the root. Donors bind to it either directly or
//! through an accepted response, which schedules an appointment. A donated
//! appointment, or a hospital marking the request complete, records the
//! donation, credits inventory and completes the request in one commit.

pub mod appointment;
pub mod completion;
pub(crate) mod recorder;
pub mod request;
pub mod response;

use serde::Serialize;

use lifeshare_database::store::CommittedMatch;
use lifeshare_entity::appointment::Appointment;
use lifeshare_entity::request::BloodRequest;
use lifeshare_entity::response::DonorResponse;

pub use appointment::{AppointmentService, AppointmentUpdate, BookAppointment};
pub use completion::{CompletedRequest, CompletionService};
pub use request::{NewBloodRequest, RequestService};
pub use response::{ResponseDecision, ResponseService};

/// A donor bound to a request, with the appointment it scheduled.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub request: BloodRequest,
    pub appointment: Appointment,
    /// The accepted response, for response-mediated matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<DonorResponse>,
    /// Pending sibling responses declined by the match.
    pub declined_responses: u64,
}

impl From<CommittedMatch> for MatchResult {
    fn from(committed: CommittedMatch) -> Self {
        Self {
            request: committed.request,
            appointment: committed.appointment,
            response: committed.response,
            declined_responses: committed.declined_responses,
        }
    }
}
