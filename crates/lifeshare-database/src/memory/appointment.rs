use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifeshare_core::result::AppResult;
use lifeshare_core::types::{AppointmentId, HospitalId, UserId};
use lifeshare_entity::appointment::{
    Appointment, AppointmentStatus, CreateAppointment, Verification,
};
use lifeshare_entity::donation::Donation;

use super::{MemoryState, MemoryStore, newest_first};
use crate::store::{AppointmentStore, DonationStore};

impl MemoryState {
    pub(crate) fn insert_appointment(&mut self, input: &CreateAppointment) -> Appointment {
        let now = Utc::now();
        let appointment = Appointment {
            id: AppointmentId::new(),
            donor_id: input.donor_id,
            recipient_id: input.recipient_id,
            request_id: input.request_id,
            appointment_date: input.appointment_date,
            appointment_time: input.appointment_time.clone(),
            hospital_id: input.hospital_id,
            hospital_name: input.hospital_name.clone(),
            hospital_address: input.hospital_address.clone(),
            status: AppointmentStatus::Scheduled,
            confirmed: false,
            verified_by: None,
            verified_hospital_id: None,
            verified_at: None,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.appointments.insert(appointment.id, appointment.clone());
        appointment
    }

    /// Whether the appointment exists and its status is one of `from`.
    pub(crate) fn appointment_in(&self, id: AppointmentId, from: &[AppointmentStatus]) -> bool {
        self.appointments
            .get(&id)
            .is_some_and(|a| from.contains(&a.status))
    }

    pub(crate) fn transition_appointment(
        &mut self,
        id: AppointmentId,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
        verification: Option<Verification>,
    ) -> Option<Appointment> {
        let appointment = self.appointments.get_mut(&id)?;
        if !from.contains(&appointment.status) {
            return None;
        }
        appointment.status = to;
        if let Some(stamp) = verification {
            appointment.verified_by = Some(stamp.verified_by);
            appointment.verified_hospital_id = Some(stamp.hospital_id);
            appointment.verified_at = Some(stamp.verified_at);
        }
        appointment.updated_at = Utc::now();
        Some(appointment.clone())
    }
}

impl MemoryStore {
    fn select_appointments(&self, filter: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> = self
            .read()
            .appointments
            .values()
            .filter(|a| filter(a))
            .cloned()
            .collect();
        newest_first(&mut appointments, |a| a.appointment_date);
        appointments
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create(&self, input: &CreateAppointment) -> AppResult<Appointment> {
        Ok(self.write().insert_appointment(input))
    }

    async fn find_by_id(&self, id: AppointmentId) -> AppResult<Option<Appointment>> {
        Ok(self.read().appointments.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Appointment>> {
        Ok(self.select_appointments(|a| a.is_attendee(user_id)))
    }

    async fn find_by_hospital(&self, hospital_id: HospitalId) -> AppResult<Vec<Appointment>> {
        Ok(self.select_appointments(|a| a.hospital_id == hospital_id))
    }

    async fn find_upcoming_by_hospital(
        &self,
        hospital_id: HospitalId,
        from: DateTime<Utc>,
    ) -> AppResult<Vec<Appointment>> {
        let mut upcoming = self.select_appointments(|a| {
            a.hospital_id == hospital_id
                && a.status == AppointmentStatus::Scheduled
                && a.appointment_date >= from
        });
        upcoming.reverse();
        Ok(upcoming)
    }

    async fn set_confirmed(&self, id: AppointmentId) -> AppResult<Option<Appointment>> {
        let mut state = self.write();
        Ok(state.appointments.get_mut(&id).map(|appointment| {
            appointment.confirmed = true;
            appointment.updated_at = Utc::now();
            appointment.clone()
        }))
    }

    async fn transition(
        &self,
        id: AppointmentId,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
        verification: Option<Verification>,
    ) -> AppResult<Option<Appointment>> {
        Ok(self
            .write()
            .transition_appointment(id, from, to, verification))
    }
}

#[async_trait]
impl DonationStore for MemoryStore {
    async fn find_by_donor(&self, donor_id: UserId) -> AppResult<Vec<Donation>> {
        let mut donations: Vec<Donation> = self
            .read()
            .donations
            .iter()
            .rev()
            .filter(|d| d.donor_id == donor_id)
            .cloned()
            .collect();
        newest_first(&mut donations, |d| d.donation_date);
        Ok(donations)
    }

    async fn count_by_donor(&self, donor_id: UserId) -> AppResult<i64> {
        let count = self
            .read()
            .donations
            .iter()
            .filter(|d| d.donor_id == donor_id)
            .count();
        Ok(count as i64)
    }

    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<i64> {
        let count = self
            .read()
            .donations
            .iter()
            .filter(|d| since.is_none_or(|at| d.donation_date >= at))
            .count();
        Ok(count as i64)
    }

    async fn latest_by_donor(&self, donor_id: UserId) -> AppResult<Option<Donation>> {
        Ok(self.find_by_donor(donor_id).await?.into_iter().next())
    }
}
