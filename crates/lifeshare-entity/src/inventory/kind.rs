//! Inventory kind and stock classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of product held in inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inventory_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    /// Whole blood.
    Blood,
    /// Separated plasma; always carries an expiry date.
    Plasma,
}

impl InventoryKind {
    /// Both kinds, in sweep order.
    pub const ALL: [InventoryKind; 2] = [Self::Blood, Self::Plasma];

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blood => "blood",
            Self::Plasma => "plasma",
        }
    }

    /// Capitalized label used in user-facing text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blood => "Blood",
            Self::Plasma => "Plasma",
        }
    }
}

impl fmt::Display for InventoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InventoryKind {
    type Err = lifeshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blood" => Ok(Self::Blood),
            "plasma" => Ok(Self::Plasma),
            _ => Err(lifeshare_core::AppError::validation(format!(
                "Invalid inventory kind: '{s}'. Expected 'blood' or 'plasma'"
            ))),
        }
    }
}

/// Stock classification shown on dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// At or above the threshold.
    Available,
    /// Below the threshold.
    Low,
}

impl StockLevel {
    /// Classify a unit count against the low-stock threshold.
    pub fn classify(units: i32, low_threshold: i32) -> Self {
        if units < low_threshold {
            Self::Low
        } else {
            Self::Available
        }
    }
}
