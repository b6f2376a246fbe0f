//! Audit log entities.

pub mod model;

pub use model::{actions, targets, AuditLogEntry, CreateAuditLogEntry};
