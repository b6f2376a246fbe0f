//! # lifeshare-database
//!
//! Persistence seam for LifeShare. The [`store`] module defines one async
//! trait per aggregate plus the two unit-of-work traits the lifecycle relies
//! on. Two backends implement them:
//!
//! - [`repositories`]: PostgreSQL via `sqlx`, with conditional updates and
//!   real transactions.
//! - [`memory`]: a single lock-guarded state with the same guard semantics,
//!   used by tests and by `database.provider = "memory"`.
//!
//! [`Repositories`] bundles the trait objects and is what services receive.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use provider::Repositories;
