use async_trait::async_trait;
use chrono::Utc;

use lifeshare_core::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::types::{HospitalId, RequestId, ResponseId, UserId};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::appointment::AppointmentStatus;
use lifeshare_entity::request::{BloodRequest, CreateBloodRequest, RequestStatus};
use lifeshare_entity::response::{DonorResponse, ResponseStatus};

use super::{MemoryStore, newest_first};
use crate::store::{CancelledRequest, RequestStore, ResponseStore};

#[async_trait]
impl RequestStore for MemoryStore {
    async fn create(&self, input: &CreateBloodRequest) -> AppResult<BloodRequest> {
        let now = Utc::now();
        let request = BloodRequest {
            id: RequestId::new(),
            recipient_id: input.recipient_id,
            donor_id: None,
            blood_group: input.blood_group,
            units_needed: input.units_needed,
            urgency: input.urgency,
            hospital_id: input.hospital_id,
            hospital_name: input.hospital_name.clone(),
            hospital_address: input.hospital_address.clone(),
            status: RequestStatus::Pending,
            donor_response: ResponseStatus::Pending,
            recipient_status: ResponseStatus::Pending,
            details: input.details.clone(),
            created_at: now,
            updated_at: now,
        };
        self.write().requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: RequestId) -> AppResult<Option<BloodRequest>> {
        Ok(self.read().requests.get(&id).cloned())
    }

    async fn find_by_recipient(&self, recipient_id: UserId) -> AppResult<Vec<BloodRequest>> {
        Ok(self.select_requests(|r| r.recipient_id == recipient_id))
    }

    async fn find_by_status(&self, statuses: &[RequestStatus]) -> AppResult<Vec<BloodRequest>> {
        Ok(self.select_requests(|r| statuses.contains(&r.status)))
    }

    async fn find_pending_by_blood_group(
        &self,
        group: BloodGroup,
        limit: i64,
    ) -> AppResult<Vec<BloodRequest>> {
        let mut requests =
            self.select_requests(|r| r.status == RequestStatus::Pending && r.blood_group == group);
        requests.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(requests)
    }

    async fn find_by_hospital(
        &self,
        hospital_id: HospitalId,
        statuses: &[RequestStatus],
    ) -> AppResult<Vec<BloodRequest>> {
        Ok(self.select_requests(|r| r.hospital_id == hospital_id && statuses.contains(&r.status)))
    }

    async fn find_completed(&self, limit: i64) -> AppResult<Vec<BloodRequest>> {
        let mut requests = self.select_requests(|r| r.status == RequestStatus::Completed);
        newest_first(&mut requests, |r| r.updated_at);
        requests.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(requests)
    }

    async fn cancel(
        &self,
        id: RequestId,
        from: &[RequestStatus],
    ) -> AppResult<Option<CancelledRequest>> {
        let mut state = self.write();
        let now = Utc::now();
        let request = match state.requests.get_mut(&id) {
            Some(request) if from.contains(&request.status) => {
                request.status = RequestStatus::Cancelled;
                request.updated_at = now;
                request.clone()
            }
            _ => return Ok(None),
        };

        let open = AppointmentStatus::allowed_sources(AppointmentStatus::Cancelled);
        let mut closed_appointments = 0;
        for appointment in state
            .appointments
            .values_mut()
            .filter(|a| a.request_id == Some(id) && open.contains(&a.status))
        {
            appointment.status = AppointmentStatus::Cancelled;
            appointment.updated_at = now;
            closed_appointments += 1;
        }

        Ok(Some(CancelledRequest {
            request,
            closed_appointments,
        }))
    }
}

impl MemoryStore {
    fn select_requests(&self, filter: impl Fn(&BloodRequest) -> bool) -> Vec<BloodRequest> {
        let mut requests: Vec<BloodRequest> = self
            .read()
            .requests
            .values()
            .filter(|r| filter(r))
            .cloned()
            .collect();
        newest_first(&mut requests, |r| r.created_at);
        requests
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn create(&self, donor_id: UserId, request_id: RequestId) -> AppResult<DonorResponse> {
        let mut state = self.write();
        if state
            .responses
            .iter()
            .any(|r| r.donor_id == donor_id && r.request_id == request_id)
        {
            return Err(AppError::conflict(
                "You have already responded to this request",
            ));
        }
        let now = Utc::now();
        let response = DonorResponse {
            id: ResponseId::new(),
            donor_id,
            request_id,
            status: ResponseStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.responses.push(response.clone());
        Ok(response)
    }

    async fn find_by_id(&self, id: ResponseId) -> AppResult<Option<DonorResponse>> {
        Ok(self.read().responses.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_donor_and_request(
        &self,
        donor_id: UserId,
        request_id: RequestId,
    ) -> AppResult<Option<DonorResponse>> {
        Ok(self
            .read()
            .responses
            .iter()
            .find(|r| r.donor_id == donor_id && r.request_id == request_id)
            .cloned())
    }

    async fn find_by_request(&self, request_id: RequestId) -> AppResult<Vec<DonorResponse>> {
        Ok(self
            .read()
            .responses
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn find_for_recipient(&self, recipient_id: UserId) -> AppResult<Vec<DonorResponse>> {
        let state = self.read();
        Ok(state
            .responses
            .iter()
            .rev()
            .filter(|r| {
                state
                    .requests
                    .get(&r.request_id)
                    .is_some_and(|req| req.recipient_id == recipient_id)
            })
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: ResponseStatus) -> AppResult<Vec<DonorResponse>> {
        let mut responses: Vec<DonorResponse> = self
            .read()
            .responses
            .iter()
            .rev()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        newest_first(&mut responses, |r| r.updated_at);
        Ok(responses)
    }

    async fn transition(
        &self,
        id: ResponseId,
        from: ResponseStatus,
        to: ResponseStatus,
    ) -> AppResult<Option<DonorResponse>> {
        let mut state = self.write();
        match state.responses.iter_mut().find(|r| r.id == id) {
            Some(response) if response.status == from => {
                response.status = to;
                response.updated_at = Utc::now();
                Ok(Some(response.clone()))
            }
            _ => Ok(None),
        }
    }
}
