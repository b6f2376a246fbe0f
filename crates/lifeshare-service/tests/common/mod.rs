//! Shared harness: services over the in-memory store with a recording mailer.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use lifeshare_core::config::AppConfig;
use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{DeliveryReceipt, MailMessage, Mailer};
use lifeshare_database::{MemoryStore, Repositories};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::hospital::{CreateHospital, Hospital};
use lifeshare_entity::request::{BloodRequest, RequestDetails, Urgency};
use lifeshare_entity::user::{CreateUser, StaffRole, User, UserRole};
use lifeshare_service::lifecycle::NewBloodRequest;
use lifeshare_service::{RequestContext, Services};

/// Records every message; fails addresses containing "bounce".
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, address: &str) -> usize {
        self.sent().iter().filter(|m| m.to == address).count()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<DeliveryReceipt> {
        if message.to.contains("bounce") {
            return Err(AppError::external("mailbox unavailable"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(DeliveryReceipt {
            message_id: Uuid::new_v4().to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

pub struct Harness {
    pub repos: Repositories,
    pub services: Services,
    pub mailer: Arc<RecordingMailer>,
    pub hospital: Hospital,
}

impl Harness {
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.notifications.send_delay_ms = 0;
        // Matching is exercised explicitly so background sends never race assertions.
        config.notifications.notify_donors_on_create = false;

        let repos = Repositories::memory(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let services = Services::new(&repos, mailer.clone(), &config);
        let mut hospital = CreateHospital::verified("City General", "desk@citygeneral.org");
        hospital.city = Some("Pune".to_string());
        hospital.address = Some("12 Station Road".to_string());
        let hospital = repos.hospitals.create(&hospital).await.unwrap();

        Self {
            repos,
            services,
            mailer,
            hospital,
        }
    }

    pub async fn donor(&self, email: &str, group: BloodGroup) -> (User, RequestContext) {
        let mut input = CreateUser::new(UserRole::Donor, email, email);
        input.blood_group = Some(group);
        let user = self.repos.users.create(&input).await.unwrap();
        let ctx = RequestContext::new(user.id, UserRole::Donor);
        (user, ctx)
    }

    pub async fn recipient(&self, email: &str) -> (User, RequestContext) {
        let input = CreateUser::new(UserRole::Recipient, email, email);
        let user = self.repos.users.create(&input).await.unwrap();
        let ctx = RequestContext::new(user.id, UserRole::Recipient);
        (user, ctx)
    }

    pub async fn staff(&self, email: &str, role: StaffRole) -> (User, RequestContext) {
        self.staff_at(&self.hospital, email, role).await
    }

    pub async fn staff_at(
        &self,
        hospital: &Hospital,
        email: &str,
        role: StaffRole,
    ) -> (User, RequestContext) {
        let mut input = CreateUser::new(UserRole::HospitalStaff, email, email);
        input.hospital_id = Some(hospital.id);
        input.staff_role = Some(role);
        let user = self.repos.users.create(&input).await.unwrap();
        let ctx = RequestContext::new(user.id, UserRole::HospitalStaff)
            .with_hospital(hospital.id)
            .with_staff_role(role);
        (user, ctx)
    }

    pub async fn hospital_account(&self) -> RequestContext {
        let mut input = CreateUser::new(UserRole::Hospital, "City General", "admin@citygeneral.org");
        input.hospital_id = Some(self.hospital.id);
        let user = self.repos.users.create(&input).await.unwrap();
        RequestContext::new(user.id, UserRole::Hospital).with_hospital(self.hospital.id)
    }

    pub async fn admin(&self) -> RequestContext {
        let input = CreateUser::new(UserRole::Admin, "Ops", "ops@lifeshare.org");
        let user = self.repos.users.create(&input).await.unwrap();
        RequestContext::new(user.id, UserRole::Admin)
    }

    pub async fn other_hospital(&self) -> Hospital {
        self.repos
            .hospitals
            .create(&CreateHospital::verified("Lakeside Clinic", "front@lakeside.org"))
            .await
            .unwrap()
    }

    pub async fn request(&self, ctx: &RequestContext, group: BloodGroup) -> BloodRequest {
        self.services
            .requests
            .create(ctx, new_request(self.hospital.id, group))
            .await
            .unwrap()
            .data
    }
}

pub fn new_request(
    hospital_id: lifeshare_core::types::HospitalId,
    group: BloodGroup,
) -> NewBloodRequest {
    NewBloodRequest {
        blood_group: group,
        units_needed: Some(1),
        urgency: Urgency::Urgent,
        hospital_id,
        details: RequestDetails {
            patient_name: Some("Meera".to_string()),
            ..RequestDetails::default()
        },
    }
}
