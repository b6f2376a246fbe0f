//! Donation appointment entities.

pub mod model;
pub mod status;

pub use model::{Appointment, CreateAppointment, Verification};
pub use status::AppointmentStatus;
