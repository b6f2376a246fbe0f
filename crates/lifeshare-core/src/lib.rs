//! # lifeshare-core
//!
//! Core crate for LifeShare. Contains configuration schemas, typed
//! identifiers, pagination and result envelopes, the outbound-messaging
//! trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LifeShare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
