//! Store bundle selected by configuration.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use lifeshare_core::config::DatabaseConfig;
use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    AppointmentRepository, AuditLogRepository, DonationLedgerRepository, DonationRepository,
    HospitalRepository, InventoryRepository, MatchRepository, NotificationRepository,
    RequestRepository, ResponseRepository, UserRepository,
};
use crate::store::{
    AppointmentStore, AuditStore, DonationLedgerStore, DonationStore, HospitalStore,
    InventoryStore, MatchStore, NotificationStore, RequestStore, ResponseStore, UserStore,
};

/// Every store the services need, behind trait objects.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub hospitals: Arc<dyn HospitalStore>,
    pub requests: Arc<dyn RequestStore>,
    pub responses: Arc<dyn ResponseStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub donations: Arc<dyn DonationStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub audit: Arc<dyn AuditStore>,
    pub matches: Arc<dyn MatchStore>,
    pub ledger: Arc<dyn DonationLedgerStore>,
    /// Present for the PostgreSQL provider.
    pool: Option<DatabasePool>,
}

impl Repositories {
    /// Build the bundle for `database.provider`, connecting and migrating as configured.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL store");
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                let mut repos = Self::postgres(db.pool().clone());
                repos.pool = Some(db);
                Ok(repos)
            }
            "memory" => {
                info!("Initializing in-memory store");
                Ok(Self::memory(MemoryStore::new()))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            hospitals: Arc::new(HospitalRepository::new(pool.clone())),
            requests: Arc::new(RequestRepository::new(pool.clone())),
            responses: Arc::new(ResponseRepository::new(pool.clone())),
            appointments: Arc::new(AppointmentRepository::new(pool.clone())),
            donations: Arc::new(DonationRepository::new(pool.clone())),
            inventory: Arc::new(InventoryRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool.clone())),
            matches: Arc::new(MatchRepository::new(pool.clone())),
            ledger: Arc::new(DonationLedgerRepository::new(pool)),
            pool: None,
        }
    }

    /// Every store backed by the same in-memory state.
    pub fn memory(store: MemoryStore) -> Self {
        let shared = Arc::new(store);
        Self {
            users: shared.clone(),
            hospitals: shared.clone(),
            requests: shared.clone(),
            responses: shared.clone(),
            appointments: shared.clone(),
            donations: shared.clone(),
            inventory: shared.clone(),
            notifications: shared.clone(),
            audit: shared.clone(),
            matches: shared.clone(),
            ledger: shared,
            pool: None,
        }
    }

    /// Check backend connectivity. Always healthy in memory.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(db) => db.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(db) = &self.pool {
            db.close().await;
        }
    }
}
