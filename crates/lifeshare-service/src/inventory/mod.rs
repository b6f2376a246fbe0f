//! Inventory: the stock ledger and the expiry watcher.

pub mod expiry;
pub mod ledger;

use serde::Serialize;

use lifeshare_entity::inventory::{InventoryUnit, StockLevel};

pub use expiry::{ExpiryReport, ExpiryService};
pub use ledger::{InventoryService, StockAdjustment};

/// An inventory row with its dashboard classification.
#[derive(Debug, Clone, Serialize)]
pub struct StockView {
    #[serde(flatten)]
    pub unit: InventoryUnit,
    pub level: StockLevel,
}

impl StockView {
    pub fn new(unit: InventoryUnit, low_threshold: i32) -> Self {
        let level = unit.level(low_threshold);
        Self { unit, level }
    }
}
