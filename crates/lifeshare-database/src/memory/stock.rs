use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, InventoryUnitId};
use lifeshare_entity::inventory::{
    InventoryKind, InventoryUnit, PlasmaIntake, StockKey, UpdatePlasma,
};

use super::{MemoryState, MemoryStore};
use crate::store::InventoryStore;
use crate::store::inventory::{BELOW_ZERO_MESSAGE, NO_STOCK_MESSAGE, OVERFLOW_MESSAGE};

/// `current + delta`, rejecting negative results and overflow.
fn next_count(current: i32, delta: i32) -> AppResult<i32> {
    match current.checked_add(delta) {
        Some(next) if next < 0 => Err(AppError::validation(BELOW_ZERO_MESSAGE)),
        Some(next) => Ok(next),
        None if delta < 0 => Err(AppError::validation(BELOW_ZERO_MESSAGE)),
        None => Err(AppError::validation(OVERFLOW_MESSAGE)),
    }
}

impl MemoryState {
    fn stock_row_mut(&mut self, key: &StockKey) -> Option<&mut InventoryUnit> {
        self.inventory.values_mut().find(|unit| unit.key() == *key)
    }

    /// Validate a delta against the floor rules without writing.
    pub(crate) fn check_stock_delta(&self, key: &StockKey, delta: i32) -> AppResult<()> {
        match self.inventory.values().find(|unit| unit.key() == *key) {
            Some(unit) => next_count(unit.units_available, delta).map(|_| ()),
            None if delta > 0 => Ok(()),
            None => Err(AppError::validation(NO_STOCK_MESSAGE)),
        }
    }

    pub(crate) fn apply_stock_delta(
        &mut self,
        key: &StockKey,
        delta: i32,
    ) -> AppResult<InventoryUnit> {
        let now = Utc::now();
        match self.stock_row_mut(key) {
            Some(unit) => {
                unit.units_available = next_count(unit.units_available, delta)?;
                unit.last_updated = now;
                Ok(unit.clone())
            }
            None if delta > 0 => {
                let unit = InventoryUnit {
                    id: InventoryUnitId::new(),
                    kind: key.kind,
                    hospital_id: key.hospital_id,
                    blood_group: key.blood_group,
                    units_available: delta,
                    expiry_date: None,
                    source_unit_id: None,
                    separation_date: None,
                    last_updated: now,
                    created_at: now,
                };
                self.inventory.insert(unit.id, unit.clone());
                Ok(unit)
            }
            None => Err(AppError::validation(NO_STOCK_MESSAGE)),
        }
    }
}

impl MemoryStore {
    fn select_stock(&self, filter: impl Fn(&InventoryUnit) -> bool) -> Vec<InventoryUnit> {
        let mut units: Vec<InventoryUnit> = self
            .read()
            .inventory
            .values()
            .filter(|u| filter(u))
            .cloned()
            .collect();
        units.sort_by_key(|u| (u.hospital_id.into_uuid(), u.blood_group));
        units
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find(&self, key: &StockKey) -> AppResult<Option<InventoryUnit>> {
        Ok(self
            .read()
            .inventory
            .values()
            .find(|unit| unit.key() == *key)
            .cloned())
    }

    async fn find_by_id(&self, id: InventoryUnitId) -> AppResult<Option<InventoryUnit>> {
        Ok(self.read().inventory.get(&id).cloned())
    }

    async fn find_by_hospital(
        &self,
        hospital_id: HospitalId,
        kind: InventoryKind,
    ) -> AppResult<Vec<InventoryUnit>> {
        Ok(self.select_stock(|u| u.hospital_id == hospital_id && u.kind == kind))
    }

    async fn find_all(&self, kind: InventoryKind) -> AppResult<Vec<InventoryUnit>> {
        Ok(self.select_stock(|u| u.kind == kind))
    }

    async fn find_expiring(
        &self,
        kind: InventoryKind,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<InventoryUnit>> {
        let mut units = self.select_stock(|u| {
            u.kind == kind
                && u.units_available > 0
                && u.expiry_date.is_some_and(|e| e > after && e <= until)
        });
        units.sort_by_key(|u| u.expiry_date);
        Ok(units)
    }

    async fn apply_delta(&self, key: &StockKey, delta: i32) -> AppResult<InventoryUnit> {
        self.write().apply_stock_delta(key, delta)
    }

    async fn register_plasma(&self, intake: &PlasmaIntake) -> AppResult<InventoryUnit> {
        let key = StockKey::plasma(intake.hospital_id, intake.blood_group);
        let now = Utc::now();
        let mut state = self.write();
        if let Some(unit) = state.stock_row_mut(&key) {
            unit.units_available = next_count(unit.units_available, intake.units)?;
            unit.expiry_date = Some(
                unit.expiry_date
                    .map_or(intake.expiry_date, |current| current.min(intake.expiry_date)),
            );
            unit.source_unit_id = intake.source_unit_id.or(unit.source_unit_id);
            unit.separation_date = intake.separation_date.or(unit.separation_date);
            unit.last_updated = now;
            return Ok(unit.clone());
        }
        let unit = InventoryUnit {
            id: InventoryUnitId::new(),
            kind: InventoryKind::Plasma,
            hospital_id: intake.hospital_id,
            blood_group: intake.blood_group,
            units_available: intake.units,
            expiry_date: Some(intake.expiry_date),
            source_unit_id: intake.source_unit_id,
            separation_date: intake.separation_date,
            last_updated: now,
            created_at: now,
        };
        state.inventory.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn update_plasma(
        &self,
        id: InventoryUnitId,
        update: &UpdatePlasma,
    ) -> AppResult<Option<InventoryUnit>> {
        let mut state = self.write();
        let Some(unit) = state
            .inventory
            .get_mut(&id)
            .filter(|u| u.kind == InventoryKind::Plasma)
        else {
            return Ok(None);
        };
        if let Some(units) = update.units_available {
            unit.units_available = units;
        }
        if let Some(expiry) = update.expiry_date {
            unit.expiry_date = Some(expiry);
        }
        if let Some(separated) = update.separation_date {
            unit.separation_date = Some(separated);
        }
        unit.last_updated = Utc::now();
        Ok(Some(unit.clone()))
    }

    async fn delete_plasma(&self, id: InventoryUnitId) -> AppResult<bool> {
        let mut state = self.write();
        let is_plasma = state
            .inventory
            .get(&id)
            .is_some_and(|u| u.kind == InventoryKind::Plasma);
        if is_plasma {
            state.inventory.remove(&id);
        }
        Ok(is_plasma)
    }
}
