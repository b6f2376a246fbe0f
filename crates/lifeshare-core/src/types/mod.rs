//! Core type definitions used across the LifeShare workspace.

pub mod id;
pub mod outcome;
pub mod pagination;

pub use id::*;
pub use outcome::Outcome;
pub use pagination::{PageRequest, PageResponse};
