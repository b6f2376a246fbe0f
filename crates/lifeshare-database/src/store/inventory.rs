//! Inventory persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, InventoryUnitId};
use lifeshare_entity::inventory::{
    InventoryKind, InventoryUnit, PlasmaIntake, StockKey, UpdatePlasma,
};

/// Message when a reduction targets a key with no row.
pub const NO_STOCK_MESSAGE: &str = "Cannot reduce non-existent stock";
/// Message when a reduction would go below zero.
pub const BELOW_ZERO_MESSAGE: &str = "Insufficient stock: units cannot go below zero";
/// Message when a change would push a count past what a row can hold.
pub const OVERFLOW_MESSAGE: &str = "Stock count exceeds the supported maximum";

/// Persistence operations on inventory rows keyed by (kind, hospital, blood group).
#[async_trait]
pub trait InventoryStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find the row for a key.
    async fn find(&self, key: &StockKey) -> AppResult<Option<InventoryUnit>>;

    /// Find a row by primary key.
    async fn find_by_id(&self, id: InventoryUnitId) -> AppResult<Option<InventoryUnit>>;

    /// Rows of one kind at a hospital, by blood group.
    async fn find_by_hospital(
        &self,
        hospital_id: HospitalId,
        kind: InventoryKind,
    ) -> AppResult<Vec<InventoryUnit>>;

    /// Rows of one kind across all hospitals.
    async fn find_all(&self, kind: InventoryKind) -> AppResult<Vec<InventoryUnit>>;

    /// Rows with stock expiring in `(after, until]`.
    async fn find_expiring(
        &self,
        kind: InventoryKind,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<InventoryUnit>>;

    /// Add `delta` to the row for `key`.
    ///
    /// A positive delta creates the row when absent. A non-positive delta on
    /// an absent row, or any delta that would leave a negative count, is
    /// rejected with a validation error and nothing changes. So is a total
    /// past `i32::MAX`.
    async fn apply_delta(&self, key: &StockKey, delta: i32) -> AppResult<InventoryUnit>;

    /// Upsert plasma: add units and keep the earliest expiry. A total past
    /// `i32::MAX` is rejected with a validation error.
    async fn register_plasma(&self, intake: &PlasmaIntake) -> AppResult<InventoryUnit>;

    /// Correct a plasma row.
    async fn update_plasma(
        &self,
        id: InventoryUnitId,
        update: &UpdatePlasma,
    ) -> AppResult<Option<InventoryUnit>>;

    /// Delete a plasma row. Returns `true` if deleted.
    async fn delete_plasma(&self, id: InventoryUnitId) -> AppResult<bool>;
}
