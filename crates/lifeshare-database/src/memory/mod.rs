//! In-memory implementation of every store trait.
//!
//! All data lives behind one `RwLock`, so each trait method, including the
//! two unit-of-work commits, is atomic with respect to every other. Guards
//! are checked before anything is written.

mod appointment;
mod ledger;
mod matching;
mod notices;
mod people;
mod request;
mod stock;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lifeshare_core::types::{
    AppointmentId, HospitalId, InventoryUnitId, RequestId, ResponseId, UserId,
};
use lifeshare_entity::appointment::Appointment;
use lifeshare_entity::audit::AuditLogEntry;
use lifeshare_entity::donation::Donation;
use lifeshare_entity::hospital::Hospital;
use lifeshare_entity::inventory::InventoryUnit;
use lifeshare_entity::notification::Notification;
use lifeshare_entity::request::BloodRequest;
use lifeshare_entity::response::DonorResponse;
use lifeshare_entity::user::User;

/// Rows held by the memory store. Append-only collections keep insertion order.
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) hospitals: HashMap<HospitalId, Hospital>,
    pub(crate) requests: HashMap<RequestId, BloodRequest>,
    pub(crate) responses: Vec<DonorResponse>,
    pub(crate) appointments: HashMap<AppointmentId, Appointment>,
    pub(crate) donations: Vec<Donation>,
    pub(crate) inventory: HashMap<InventoryUnitId, InventoryUnit>,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) audit: Vec<AuditLogEntry>,
}

/// Process-local store. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sort newest first by a timestamp key; ties keep their existing order.
pub(crate) fn newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}
