//! Inventory repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, InventoryUnitId};
use lifeshare_entity::inventory::{
    InventoryKind, InventoryUnit, PlasmaIntake, StockKey, UpdatePlasma,
};

use crate::store::InventoryStore;
use crate::store::inventory::{BELOW_ZERO_MESSAGE, NO_STOCK_MESSAGE, OVERFLOW_MESSAGE};

/// Repository for blood and plasma stock.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQLSTATE `numeric_value_out_of_range`.
const OUT_OF_RANGE: &str = "22003";

/// Map a failed stock write, reporting an overflowing count as a validation error.
fn stock_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    let overflow = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == OUT_OF_RANGE);
    if overflow {
        AppError::validation(OVERFLOW_MESSAGE)
    } else {
        AppError::with_source(ErrorKind::Database, context, e)
    }
}

/// Apply a stock delta on an open connection or transaction.
pub(crate) async fn apply_delta_on(
    conn: &mut PgConnection,
    key: &StockKey,
    delta: i32,
) -> AppResult<InventoryUnit> {
    if delta > 0 {
        return sqlx::query_as::<_, InventoryUnit>(
            "INSERT INTO inventory_units (id, kind, hospital_id, blood_group, units_available) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (kind, hospital_id, blood_group) DO UPDATE SET \
             units_available = inventory_units.units_available + EXCLUDED.units_available, \
             last_updated = NOW() \
             RETURNING *",
        )
        .bind(InventoryUnitId::new())
        .bind(key.kind)
        .bind(key.hospital_id)
        .bind(key.blood_group)
        .bind(delta)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| stock_write_error(e, "Failed to credit inventory"));
    }

    let updated = sqlx::query_as::<_, InventoryUnit>(
        "UPDATE inventory_units SET units_available = units_available + $4, last_updated = NOW() \
         WHERE kind = $1 AND hospital_id = $2 AND blood_group = $3 \
         AND units_available + $4 >= 0 RETURNING *",
    )
    .bind(key.kind)
    .bind(key.hospital_id)
    .bind(key.blood_group)
    .bind(delta)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to debit inventory", e))?;

    if let Some(unit) = updated {
        return Ok(unit);
    }

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM inventory_units \
         WHERE kind = $1 AND hospital_id = $2 AND blood_group = $3)",
    )
    .bind(key.kind)
    .bind(key.hospital_id)
    .bind(key.blood_group)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up inventory", e))?;

    if exists {
        Err(AppError::validation(BELOW_ZERO_MESSAGE))
    } else {
        Err(AppError::validation(NO_STOCK_MESSAGE))
    }
}

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn find(&self, key: &StockKey) -> AppResult<Option<InventoryUnit>> {
        sqlx::query_as::<_, InventoryUnit>(
            "SELECT * FROM inventory_units WHERE kind = $1 AND hospital_id = $2 AND blood_group = $3",
        )
        .bind(key.kind)
        .bind(key.hospital_id)
        .bind(key.blood_group)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find inventory", e))
    }

    async fn find_by_id(&self, id: InventoryUnitId) -> AppResult<Option<InventoryUnit>> {
        sqlx::query_as::<_, InventoryUnit>("SELECT * FROM inventory_units WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find inventory", e))
    }

    async fn find_by_hospital(
        &self,
        hospital_id: HospitalId,
        kind: InventoryKind,
    ) -> AppResult<Vec<InventoryUnit>> {
        sqlx::query_as::<_, InventoryUnit>(
            "SELECT * FROM inventory_units WHERE hospital_id = $1 AND kind = $2 ORDER BY blood_group",
        )
        .bind(hospital_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list inventory", e))
    }

    async fn find_all(&self, kind: InventoryKind) -> AppResult<Vec<InventoryUnit>> {
        sqlx::query_as::<_, InventoryUnit>(
            "SELECT * FROM inventory_units WHERE kind = $1 ORDER BY hospital_id, blood_group",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list inventory", e))
    }

    async fn find_expiring(
        &self,
        kind: InventoryKind,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<InventoryUnit>> {
        sqlx::query_as::<_, InventoryUnit>(
            "SELECT * FROM inventory_units WHERE kind = $1 AND units_available > 0 \
             AND expiry_date > $2 AND expiry_date <= $3 ORDER BY expiry_date",
        )
        .bind(kind)
        .bind(after)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find expiring stock", e))
    }

    async fn apply_delta(&self, key: &StockKey, delta: i32) -> AppResult<InventoryUnit> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        apply_delta_on(&mut conn, key, delta).await
    }

    async fn register_plasma(&self, intake: &PlasmaIntake) -> AppResult<InventoryUnit> {
        sqlx::query_as::<_, InventoryUnit>(
            "INSERT INTO inventory_units (id, kind, hospital_id, blood_group, units_available, \
             expiry_date, source_unit_id, separation_date) \
             VALUES ($1, 'plasma', $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (kind, hospital_id, blood_group) DO UPDATE SET \
             units_available = inventory_units.units_available + EXCLUDED.units_available, \
             expiry_date = LEAST(inventory_units.expiry_date, EXCLUDED.expiry_date), \
             source_unit_id = COALESCE(EXCLUDED.source_unit_id, inventory_units.source_unit_id), \
             separation_date = COALESCE(EXCLUDED.separation_date, inventory_units.separation_date), \
             last_updated = NOW() \
             RETURNING *",
        )
        .bind(InventoryUnitId::new())
        .bind(intake.hospital_id)
        .bind(intake.blood_group)
        .bind(intake.units)
        .bind(intake.expiry_date)
        .bind(intake.source_unit_id)
        .bind(intake.separation_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| stock_write_error(e, "Failed to register plasma"))
    }

    async fn update_plasma(
        &self,
        id: InventoryUnitId,
        update: &UpdatePlasma,
    ) -> AppResult<Option<InventoryUnit>> {
        sqlx::query_as::<_, InventoryUnit>(
            "UPDATE inventory_units SET \
             units_available = COALESCE($2, units_available), \
             expiry_date = COALESCE($3, expiry_date), \
             separation_date = COALESCE($4, separation_date), \
             last_updated = NOW() \
             WHERE id = $1 AND kind = 'plasma' RETURNING *",
        )
        .bind(id)
        .bind(update.units_available)
        .bind(update.expiry_date)
        .bind(update.separation_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update plasma", e))
    }

    async fn delete_plasma(&self, id: InventoryUnitId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM inventory_units WHERE id = $1 AND kind = 'plasma'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete plasma", e))?;
        Ok(result.rows_affected() > 0)
    }
}
