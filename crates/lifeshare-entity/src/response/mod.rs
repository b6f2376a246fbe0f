//! Donor response entities.

pub mod model;
pub mod status;

pub use model::DonorResponse;
pub use status::ResponseStatus;
