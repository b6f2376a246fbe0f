use async_trait::async_trait;
use chrono::Utc;

use lifeshare_core::result::AppResult;
use lifeshare_entity::request::RequestStatus;
use lifeshare_entity::response::ResponseStatus;

use super::MemoryStore;
use crate::store::{CommittedMatch, MatchCommit, MatchKind, MatchStore};

#[async_trait]
impl MatchStore for MemoryStore {
    async fn commit_match(&self, commit: &MatchCommit) -> AppResult<Option<CommittedMatch>> {
        let mut state = self.write();

        let request_pending = state
            .requests
            .get(&commit.request_id)
            .is_some_and(|r| r.status == RequestStatus::Pending);
        if !request_pending {
            return Ok(None);
        }
        if let MatchKind::Response(response_id) = commit.kind {
            let response_pending = state.responses.iter().any(|r| {
                r.id == response_id
                    && r.request_id == commit.request_id
                    && r.status == ResponseStatus::Pending
            });
            if !response_pending {
                return Ok(None);
            }
        }

        let now = Utc::now();
        let mut response = None;
        let mut declined_responses = 0;
        if let MatchKind::Response(response_id) = commit.kind {
            for candidate in state
                .responses
                .iter_mut()
                .filter(|r| r.request_id == commit.request_id)
            {
                if candidate.id == response_id {
                    candidate.status = ResponseStatus::Accepted;
                    candidate.updated_at = now;
                    response = Some(candidate.clone());
                } else if candidate.status == ResponseStatus::Pending {
                    candidate.status = ResponseStatus::Declined;
                    candidate.updated_at = now;
                    declined_responses += 1;
                }
            }
        }

        let Some(request) = state.requests.get_mut(&commit.request_id) else {
            return Ok(None);
        };
        request.status = commit.kind.target_status();
        request.donor_id = Some(commit.donor_id);
        match commit.kind {
            MatchKind::Direct => {
                request.donor_response = ResponseStatus::Accepted;
                request.recipient_status = ResponseStatus::Accepted;
            }
            MatchKind::Response(_) => {
                request.units_needed = Some(request.units_needed.unwrap_or(1));
                request.urgency = request.urgency.normalized();
            }
        }
        request.updated_at = now;
        let request = request.clone();

        let appointment = state.insert_appointment(&commit.appointment);

        Ok(Some(CommittedMatch {
            request,
            appointment,
            response,
            declined_responses,
        }))
    }
}
