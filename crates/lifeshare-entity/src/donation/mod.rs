//! Donation ledger entities.

pub mod model;

pub use model::{CreateDonation, Donation};
