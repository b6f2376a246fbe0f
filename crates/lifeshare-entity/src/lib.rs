//! # lifeshare-entity
//!
//! Domain entity models for LifeShare. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! Status, role and category values are closed enums; anything outside the
//! enumerated set is rejected by `FromStr` with a validation error.

pub mod appointment;
pub mod audit;
pub mod blood;
pub mod donation;
pub mod hospital;
pub mod inventory;
pub mod notification;
pub mod request;
pub mod response;
pub mod user;

pub use blood::BloodGroup;
