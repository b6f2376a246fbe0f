//! Blood request entities.

pub mod model;
pub mod status;
pub mod urgency;

pub use model::{BloodRequest, CreateBloodRequest, RequestDetails};
pub use status::RequestStatus;
pub use urgency::{PatientGender, Urgency};
