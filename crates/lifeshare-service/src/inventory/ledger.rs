//! Stock ledger: donation credit, supervisor corrections and plasma admin.
//!
//! Every change goes through [`InventoryStore::apply_delta`] or the plasma
//! upsert, so a stored count is never negative. Donation credit is
//! unrestricted; manual correction needs a supervisor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use lifeshare_core::config::LifecycleConfig;
use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{InventoryUnitId, Outcome};
use lifeshare_database::store::{AuditStore, InventoryStore};
use lifeshare_entity::audit::{CreateAuditLogEntry, actions, targets};
use lifeshare_entity::inventory::{
    InventoryKind, InventoryUnit, PlasmaIntake, StockKey, StockLevel, UpdatePlasma,
};
use lifeshare_entity::notification::{NewNotification, NotificationKind};
use lifeshare_entity::user::UserRole;
use lifeshare_entity::BloodGroup;

use super::StockView;
use crate::context::RequestContext;
use crate::notification::NotificationDispatcher;

/// A manual stock correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub blood_group: BloodGroup,
    /// Signed change in units. Zero is rejected.
    pub adjustment: i32,
    pub reason: Option<String>,
}

/// Reads and writes inventory on behalf of hospitals and admins.
#[derive(Debug, Clone)]
pub struct InventoryService {
    inventory: Arc<dyn InventoryStore>,
    audit: Arc<dyn AuditStore>,
    dispatcher: NotificationDispatcher,
    low_stock_threshold: i32,
}

impl InventoryService {
    /// Creates a new inventory service.
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        audit: Arc<dyn AuditStore>,
        dispatcher: NotificationDispatcher,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            inventory,
            audit,
            dispatcher,
            low_stock_threshold: config.low_stock_threshold,
        }
    }

    /// Stock of one kind at the caller's hospital.
    pub async fn stock_for_hospital(
        &self,
        ctx: &RequestContext,
        kind: InventoryKind,
    ) -> AppResult<Vec<StockView>> {
        let hospital_id = ctx.require_hospital()?;
        let units = self.inventory.find_by_hospital(hospital_id, kind).await?;
        Ok(self.classify(units))
    }

    /// Blood rows at the caller's hospital below the low-stock threshold.
    pub async fn low_stock(&self, ctx: &RequestContext) -> AppResult<Vec<StockView>> {
        let stock = self.stock_for_hospital(ctx, InventoryKind::Blood).await?;
        Ok(stock
            .into_iter()
            .filter(|view| view.level == StockLevel::Low)
            .collect())
    }

    /// Unrestricted credit or debit, as done for donations.
    pub async fn credit(&self, key: &StockKey, delta: i32) -> AppResult<InventoryUnit> {
        let unit = self.inventory.apply_delta(key, delta).await?;
        info!(
            hospital_id = %key.hospital_id,
            blood_group = %key.blood_group,
            kind = %key.kind,
            delta,
            units_available = unit.units_available,
            "Inventory credited"
        );
        Ok(unit)
    }

    /// Supervisor correction of blood stock at the caller's hospital.
    pub async fn adjust(
        &self,
        ctx: &RequestContext,
        input: StockAdjustment,
    ) -> AppResult<Outcome<StockView>> {
        ctx.require_role(&[UserRole::HospitalStaff])?;
        let hospital_id = ctx.require_hospital()?;
        if !ctx.staff_role.is_some_and(|role| role.can_adjust_stock()) {
            return Err(AppError::authorization(
                "Only supervisors can adjust inventory",
            ));
        }
        if input.adjustment == 0 {
            return Err(AppError::validation("Adjustment must not be zero"));
        }

        let key = StockKey::blood(hospital_id, input.blood_group);
        let unit = self.inventory.apply_delta(&key, input.adjustment).await?;
        info!(
            hospital_id = %hospital_id,
            blood_group = %input.blood_group,
            adjustment = input.adjustment,
            units_available = unit.units_available,
            actor_id = %ctx.user_id,
            "Stock adjusted"
        );

        let entry = CreateAuditLogEntry::new(
            ctx.user_id,
            actions::STOCK_ADJUSTED,
            targets::INVENTORY,
            Some(unit.id.into_uuid()),
            json!({
                "blood_group": input.blood_group,
                "adjustment": input.adjustment,
                "reason": input.reason,
                "units_available": unit.units_available,
            }),
        );
        if let Err(e) = self.audit.append(&entry).await {
            warn!(unit_id = %unit.id, error = %e, "Failed to write stock audit entry");
        }

        let direction = if input.adjustment > 0 {
            "increased"
        } else {
            "decreased"
        };
        self.dispatcher
            .record(
                NewNotification::new(
                    ctx.user_id,
                    NotificationKind::StockAdjusted,
                    "Stock Adjusted",
                    format!(
                        "{} inventory {} by {} units.",
                        input.blood_group,
                        direction,
                        input.adjustment.unsigned_abs()
                    ),
                )
                .inventory_unit(unit.id),
            )
            .await;

        Ok(Outcome::new(
            "Stock adjusted successfully",
            StockView::new(unit, self.low_stock_threshold),
        ))
    }

    /// Register separated plasma (admin). Units add to an existing row.
    pub async fn register_plasma(
        &self,
        ctx: &RequestContext,
        intake: PlasmaIntake,
    ) -> AppResult<Outcome<InventoryUnit>> {
        ctx.require_admin()?;
        if intake.units < 1 {
            return Err(AppError::validation("Plasma units must be at least 1"));
        }
        let unit = self.inventory.register_plasma(&intake).await?;
        info!(
            unit_id = %unit.id,
            hospital_id = %unit.hospital_id,
            blood_group = %unit.blood_group,
            units_available = unit.units_available,
            "Plasma registered"
        );
        Ok(Outcome::new("Plasma unit registered", unit))
    }

    /// Correct a plasma row (admin).
    pub async fn update_plasma(
        &self,
        ctx: &RequestContext,
        id: InventoryUnitId,
        update: UpdatePlasma,
    ) -> AppResult<Outcome<InventoryUnit>> {
        ctx.require_admin()?;
        if update.units_available.is_some_and(|units| units < 0) {
            return Err(AppError::validation("Units cannot be negative"));
        }
        let unit = self
            .inventory
            .update_plasma(id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Plasma unit not found"))?;
        Ok(Outcome::new("Plasma unit updated", unit))
    }

    /// Delete a plasma row (admin).
    pub async fn delete_plasma(&self, ctx: &RequestContext, id: InventoryUnitId) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.inventory.delete_plasma(id).await? {
            return Err(AppError::not_found("Plasma unit not found"));
        }
        info!(unit_id = %id, "Plasma unit deleted");
        Ok(())
    }

    /// Stock of one kind across every hospital (admin).
    pub async fn all_stock(
        &self,
        ctx: &RequestContext,
        kind: InventoryKind,
    ) -> AppResult<Vec<StockView>> {
        ctx.require_admin()?;
        let units = self.inventory.find_all(kind).await?;
        Ok(self.classify(units))
    }

    fn classify(&self, units: Vec<InventoryUnit>) -> Vec<StockView> {
        units
            .into_iter()
            .map(|unit| StockView::new(unit, self.low_stock_threshold))
            .collect()
    }
}
