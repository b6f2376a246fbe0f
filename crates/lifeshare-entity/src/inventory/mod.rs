//! Blood and plasma inventory entities.

pub mod kind;
pub mod model;

pub use kind::{InventoryKind, StockLevel};
pub use model::{InventoryUnit, PlasmaIntake, StockKey, UpdatePlasma};
