use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, UserId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::hospital::{CreateHospital, Hospital};
use lifeshare_entity::user::{CreateUser, User, UserRole};

use super::MemoryStore;
use crate::store::hospital::IN_USE_MESSAGE;
use crate::store::{HospitalStore, UserStore};

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, input: &CreateUser) -> AppResult<User> {
        let user = User {
            id: UserId::new(),
            role: input.role,
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            blood_group: input.blood_group,
            hospital_id: input.hospital_id,
            staff_role: input.staff_role,
            last_donation_date: input.last_donation_date,
            last_reminder_sent: input.last_reminder_sent,
            created_at: Utc::now(),
        };
        self.write().users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn find_donors_by_blood_group(&self, group: BloodGroup) -> AppResult<Vec<User>> {
        let mut donors: Vec<User> = self
            .read()
            .users
            .values()
            .filter(|u| u.role == UserRole::Donor && u.blood_group == Some(group))
            .cloned()
            .collect();
        donors.sort_by_key(|u| u.created_at);
        Ok(donors)
    }

    async fn find_reminder_candidates(
        &self,
        donated_before: DateTime<Utc>,
        reminded_before: DateTime<Utc>,
    ) -> AppResult<Vec<User>> {
        let mut donors: Vec<User> = self
            .read()
            .users
            .values()
            .filter(|u| {
                u.role == UserRole::Donor
                    && u.last_donation_date.is_some_and(|d| d <= donated_before)
                    && u.last_reminder_sent.is_none_or(|r| r <= reminded_before)
            })
            .cloned()
            .collect();
        donors.sort_by_key(|u| u.last_donation_date);
        Ok(donors)
    }

    async fn find_staff_by_hospital(&self, hospital_id: HospitalId) -> AppResult<Vec<User>> {
        let mut staff: Vec<User> = self
            .read()
            .users
            .values()
            .filter(|u| u.role == UserRole::HospitalStaff && u.hospital_id == Some(hospital_id))
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(staff)
    }

    async fn count_by_role(&self, role: Option<UserRole>) -> AppResult<i64> {
        let count = self
            .read()
            .users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .count();
        Ok(count as i64)
    }

    async fn mark_reminder_sent(&self, id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.write().users.get_mut(&id) {
            user.last_reminder_sent = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl HospitalStore for MemoryStore {
    async fn create(&self, input: &CreateHospital) -> AppResult<Hospital> {
        let hospital = Hospital {
            id: HospitalId::new(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            city: input.city.clone(),
            pincode: input.pincode.clone(),
            address: input.address.clone(),
            verified: input.verified,
            created_at: Utc::now(),
        };
        self.write().hospitals.insert(hospital.id, hospital.clone());
        Ok(hospital)
    }

    async fn find_by_id(&self, id: HospitalId) -> AppResult<Option<Hospital>> {
        Ok(self.read().hospitals.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Hospital>> {
        let mut hospitals: Vec<Hospital> = self.read().hospitals.values().cloned().collect();
        hospitals.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hospitals)
    }

    async fn find_verified(&self) -> AppResult<Vec<Hospital>> {
        let mut hospitals = HospitalStore::find_all(self).await?;
        hospitals.retain(|h| h.verified);
        Ok(hospitals)
    }

    async fn set_verified(&self, id: HospitalId, verified: bool) -> AppResult<Option<Hospital>> {
        let mut state = self.write();
        Ok(state.hospitals.get_mut(&id).map(|hospital| {
            hospital.verified = verified;
            hospital.clone()
        }))
    }

    async fn delete(&self, id: HospitalId) -> AppResult<bool> {
        let mut state = self.write();
        if !state.hospitals.contains_key(&id) {
            return Ok(false);
        }
        let in_use = state.users.values().any(|u| u.hospital_id == Some(id))
            || state.requests.values().any(|r| r.hospital_id == id)
            || state
                .appointments
                .values()
                .any(|a| a.hospital_id == id || a.verified_hospital_id == Some(id))
            || state.donations.iter().any(|d| d.hospital_id == id)
            || state.inventory.values().any(|u| u.hospital_id == id);
        if in_use {
            return Err(AppError::conflict(IN_USE_MESSAGE));
        }
        state.hospitals.remove(&id);
        Ok(true)
    }
}
