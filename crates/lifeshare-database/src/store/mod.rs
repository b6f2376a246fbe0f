//! Store traits: the persistence seam consumed by the service layer.
//!
//! Every status change goes through a conditional update that names the
//! statuses it may leave. When the row has already moved on, the store
//! returns `None` and the caller reports a conflict.

pub mod appointment;
pub mod audit;
pub mod donation;
pub mod hospital;
pub mod inventory;
pub mod notification;
pub mod request;
pub mod response;
pub mod unit_of_work;
pub mod user;

pub use appointment::AppointmentStore;
pub use audit::AuditStore;
pub use donation::DonationStore;
pub use hospital::HospitalStore;
pub use inventory::InventoryStore;
pub use notification::NotificationStore;
pub use request::{CancelledRequest, RequestStore};
pub use response::ResponseStore;
pub use unit_of_work::{
    AppointmentTransition, CommittedMatch, DonationCommit, DonationLedgerStore, DonationReceipt,
    MatchCommit, MatchKind, MatchStore, RequestCompletion,
};
pub use user::UserStore;
