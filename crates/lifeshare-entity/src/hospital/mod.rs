//! Hospital domain entities.

pub mod model;

pub use model::{CreateHospital, Hospital};
