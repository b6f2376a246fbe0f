//! Inventory unit entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lifeshare_core::types::{HospitalId, InventoryUnitId};

use crate::blood::BloodGroup;

use super::kind::{InventoryKind, StockLevel};

/// Composite key of an inventory row. At most one live row per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub kind: InventoryKind,
    pub hospital_id: HospitalId,
    pub blood_group: BloodGroup,
}

impl StockKey {
    /// Key for whole blood at a hospital.
    pub fn blood(hospital_id: HospitalId, blood_group: BloodGroup) -> Self {
        Self {
            kind: InventoryKind::Blood,
            hospital_id,
            blood_group,
        }
    }

    /// Key for plasma at a hospital.
    pub fn plasma(hospital_id: HospitalId, blood_group: BloodGroup) -> Self {
        Self {
            kind: InventoryKind::Plasma,
            hospital_id,
            blood_group,
        }
    }
}

/// Units of one blood group held by one hospital.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryUnit {
    /// Unique row identifier.
    pub id: InventoryUnitId,
    /// Blood or plasma.
    pub kind: InventoryKind,
    /// Owning hospital.
    pub hospital_id: HospitalId,
    /// Blood group held.
    pub blood_group: BloodGroup,
    /// Units available, never negative.
    pub units_available: i32,
    /// Expiry date; required for plasma.
    pub expiry_date: Option<DateTime<Utc>>,
    /// Blood row the plasma was separated from.
    pub source_unit_id: Option<InventoryUnitId>,
    /// When the plasma was separated.
    pub separation_date: Option<DateTime<Utc>>,
    /// When the count last changed.
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl InventoryUnit {
    /// Composite key of this row.
    pub fn key(&self) -> StockKey {
        StockKey {
            kind: self.kind,
            hospital_id: self.hospital_id,
            blood_group: self.blood_group,
        }
    }

    /// Stock classification against the threshold.
    pub fn level(&self, low_threshold: i32) -> StockLevel {
        StockLevel::classify(self.units_available, low_threshold)
    }

    /// Whether the row holds stock that expires within `(now, now + window]`.
    pub fn is_expiring(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.units_available > 0
            && self
                .expiry_date
                .is_some_and(|expiry| expiry > now && expiry <= now + window)
    }
}

/// Plasma registered by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlasmaIntake {
    pub hospital_id: HospitalId,
    pub blood_group: BloodGroup,
    pub units: i32,
    pub expiry_date: DateTime<Utc>,
    pub source_unit_id: Option<InventoryUnitId>,
    pub separation_date: Option<DateTime<Utc>>,
}

/// Administrative correction of a plasma row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlasma {
    pub units_available: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub separation_date: Option<DateTime<Utc>>,
}
