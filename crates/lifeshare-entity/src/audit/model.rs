//! Audit log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lifeshare_core::types::{AuditLogId, UserId};

/// Action tags written by the lifecycle.
pub mod actions {
    pub const DONATION_COMPLETED: &str = "donation_completed";
    pub const APPOINTMENT_VERIFIED: &str = "appointment_verified";
    pub const APPOINTMENT_STATUS_UPDATED: &str = "appointment_status_updated";
    pub const STOCK_ADJUSTED: &str = "stock_adjusted";
    pub const HOSPITAL_CREATED: &str = "hospital_created";
    pub const HOSPITAL_VERIFIED: &str = "hospital_verified";
    pub const HOSPITAL_DELETED: &str = "hospital_deleted";
}

/// Target type tags.
pub mod targets {
    pub const APPOINTMENT: &str = "appointment";
    pub const BLOOD_REQUEST: &str = "blood_request";
    pub const INVENTORY: &str = "inventory";
    pub const HOSPITAL: &str = "hospital";
}

/// Append-only record of a staff or administrative action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    /// User who performed the action.
    pub actor_id: UserId,
    /// Action tag.
    pub action: String,
    /// Kind of entity acted upon.
    pub target_type: String,
    /// Identifier of the entity acted upon.
    pub target_id: Option<Uuid>,
    /// Free-form details.
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Data required to append an audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    pub actor_id: UserId,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub details: serde_json::Value,
}

impl CreateAuditLogEntry {
    pub fn new(
        actor_id: UserId,
        action: &str,
        target_type: &str,
        target_id: Option<Uuid>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            actor_id,
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details,
        }
    }
}
