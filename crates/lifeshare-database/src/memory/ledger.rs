use async_trait::async_trait;
use chrono::Utc;

use lifeshare_core::result::AppResult;
use lifeshare_core::types::DonationId;
use lifeshare_entity::appointment::AppointmentStatus;
use lifeshare_entity::donation::Donation;
use lifeshare_entity::request::RequestStatus;

use super::MemoryStore;
use crate::store::{DonationCommit, DonationLedgerStore, DonationReceipt};

#[async_trait]
impl DonationLedgerStore for MemoryStore {
    async fn commit_donation(&self, commit: &DonationCommit) -> AppResult<Option<DonationReceipt>> {
        let mut state = self.write();

        // Check every guard before the first write.
        if let Some(transition) = &commit.appointment {
            if !state.appointment_in(transition.appointment_id, &transition.from) {
                return Ok(None);
            }
        }
        let donor_id = commit.donation.donor_id;
        let request_bound = commit.request.is_some_and(|completion| {
            state
                .requests
                .get(&completion.request_id)
                .is_some_and(|r| r.is_bound_to(donor_id))
        });
        if commit.request.is_some_and(|c| c.required) && !request_bound {
            return Ok(None);
        }
        state.check_stock_delta(&commit.stock, commit.units)?;

        let appointment = match &commit.appointment {
            Some(transition) => state.transition_appointment(
                transition.appointment_id,
                &transition.from,
                AppointmentStatus::Donated,
                transition.verification,
            ),
            None => None,
        };

        let inventory = state.apply_stock_delta(&commit.stock, commit.units)?;

        let input = &commit.donation;
        let donation = Donation {
            id: DonationId::new(),
            donor_id: input.donor_id,
            blood_group: input.blood_group,
            units: input.units,
            hospital_id: input.hospital_id,
            hospital_name: input.hospital_name.clone(),
            appointment_id: input.appointment_id,
            request_id: input.request_id,
            donation_date: input.donation_date,
            created_at: Utc::now(),
        };
        state.donations.push(donation.clone());

        if let Some(donor) = state.users.get_mut(&input.donor_id) {
            donor.last_donation_date = Some(input.donation_date);
        }

        let request = match commit.request {
            Some(completion) if request_bound => {
                let now = Utc::now();
                let open = AppointmentStatus::allowed_sources(AppointmentStatus::Donated);
                for appointment in state
                    .appointments
                    .values_mut()
                    .filter(|a| a.request_id == Some(completion.request_id))
                    .filter(|a| a.donor_id == donor_id)
                    .filter(|a| open.contains(&a.status))
                {
                    appointment.status = AppointmentStatus::Donated;
                    appointment.updated_at = now;
                }
                state
                    .requests
                    .get_mut(&completion.request_id)
                    .map(|request| {
                        request.status = RequestStatus::Completed;
                        request.updated_at = now;
                        request.clone()
                    })
            }
            _ => None,
        };

        let audit = state.append_audit(&commit.audit);

        Ok(Some(DonationReceipt {
            appointment,
            inventory,
            donation,
            request,
            audit,
        }))
    }
}
