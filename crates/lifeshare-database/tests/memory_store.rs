//! Guard semantics of the in-memory store.

use chrono::{Duration, Utc};
use serde_json::json;

use lifeshare_core::error::ErrorKind;
use lifeshare_core::types::{AppointmentId, ResponseId, UserId};
use lifeshare_database::store::{
    AppointmentTransition, DonationCommit, MatchCommit, MatchKind, RequestCompletion,
};
use lifeshare_database::{MemoryStore, Repositories};
use lifeshare_entity::BloodGroup;
use lifeshare_entity::appointment::{AppointmentStatus, CreateAppointment};
use lifeshare_entity::audit::{CreateAuditLogEntry, actions, targets};
use lifeshare_entity::donation::CreateDonation;
use lifeshare_entity::hospital::{CreateHospital, Hospital};
use lifeshare_entity::inventory::{PlasmaIntake, StockKey};
use lifeshare_entity::request::{
    BloodRequest, CreateBloodRequest, RequestDetails, RequestStatus, Urgency,
};
use lifeshare_entity::response::ResponseStatus;
use lifeshare_entity::user::{CreateUser, User, UserRole};

async fn setup() -> (Repositories, Hospital, User) {
    let repos = Repositories::memory(MemoryStore::new());
    let hospital = repos
        .hospitals
        .create(&CreateHospital::verified("City General", "desk@citygeneral.org"))
        .await
        .unwrap();
    let recipient = repos
        .users
        .create(&CreateUser::new(UserRole::Recipient, "Ravi", "ravi@example.com"))
        .await
        .unwrap();
    (repos, hospital, recipient)
}

async fn donor(repos: &Repositories, email: &str, group: BloodGroup) -> User {
    let mut input = CreateUser::new(UserRole::Donor, email, email);
    input.blood_group = Some(group);
    repos.users.create(&input).await.unwrap()
}

async fn request(repos: &Repositories, hospital: &Hospital, recipient: &User) -> BloodRequest {
    repos
        .requests
        .create(&CreateBloodRequest {
            recipient_id: recipient.id,
            blood_group: BloodGroup::BPositive,
            units_needed: None,
            urgency: Urgency::Urgent,
            hospital_id: hospital.id,
            hospital_name: hospital.name.clone(),
            hospital_address: None,
            details: RequestDetails::default(),
        })
        .await
        .unwrap()
}

fn appointment_for(req: &BloodRequest, donor_id: UserId) -> CreateAppointment {
    CreateAppointment {
        donor_id,
        recipient_id: Some(req.recipient_id),
        request_id: Some(req.id),
        appointment_date: Utc::now(),
        appointment_time: None,
        hospital_id: req.hospital_id,
        hospital_name: req.hospital_name.clone(),
        hospital_address: None,
        notes: None,
    }
}

fn donation_by(
    req: &BloodRequest,
    donor_id: UserId,
    appointment_id: Option<AppointmentId>,
    required: bool,
) -> DonationCommit {
    DonationCommit {
        appointment: appointment_id.map(|appointment_id| AppointmentTransition {
            appointment_id,
            from: AppointmentStatus::allowed_sources(AppointmentStatus::Donated),
            verification: None,
        }),
        stock: StockKey::blood(req.hospital_id, BloodGroup::APositive),
        units: 1,
        donation: CreateDonation {
            donor_id,
            blood_group: BloodGroup::APositive,
            units: 1,
            hospital_id: req.hospital_id,
            hospital_name: req.hospital_name.clone(),
            appointment_id,
            request_id: Some(req.id),
            donation_date: Utc::now(),
        },
        request: Some(RequestCompletion {
            request_id: req.id,
            required,
        }),
        audit: CreateAuditLogEntry::new(
            donor_id,
            actions::DONATION_COMPLETED,
            targets::APPOINTMENT,
            None,
            json!({}),
        ),
    }
}

#[tokio::test]
async fn test_response_match_declines_pending_siblings_only() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;
    let b = donor(&repos, "b@example.com", BloodGroup::BPositive).await;
    let c = donor(&repos, "c@example.com", BloodGroup::BPositive).await;

    let ra = repos.responses.create(a.id, req.id).await.unwrap();
    let rb = repos.responses.create(b.id, req.id).await.unwrap();
    let rc = repos.responses.create(c.id, req.id).await.unwrap();
    repos
        .responses
        .transition(rc.id, ResponseStatus::Pending, ResponseStatus::Declined)
        .await
        .unwrap();

    let committed = repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: a.id,
            kind: MatchKind::Response(ra.id),
            appointment: appointment_for(&req, a.id),
        })
        .await
        .unwrap()
        .expect("match commits");

    assert_eq!(committed.request.status, RequestStatus::Matched);
    assert_eq!(committed.request.donor_id, Some(a.id));
    assert_eq!(committed.request.units_needed, Some(1));
    assert_eq!(committed.request.urgency, Urgency::Critical);
    assert_eq!(committed.declined_responses, 1);

    let rb = repos.responses.find_by_id(rb.id).await.unwrap().unwrap();
    assert_eq!(rb.status, ResponseStatus::Declined);
    let ra = repos.responses.find_by_id(ra.id).await.unwrap().unwrap();
    assert_eq!(ra.status, ResponseStatus::Accepted);
}

#[tokio::test]
async fn test_second_match_loses_and_writes_nothing() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;
    let b = donor(&repos, "b@example.com", BloodGroup::BPositive).await;
    let rb = repos.responses.create(b.id, req.id).await.unwrap();

    repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: a.id,
            kind: MatchKind::Direct,
            appointment: appointment_for(&req, a.id),
        })
        .await
        .unwrap()
        .expect("first accept wins");

    let lost = repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: b.id,
            kind: MatchKind::Response(rb.id),
            appointment: appointment_for(&req, b.id),
        })
        .await
        .unwrap();
    assert!(lost.is_none());

    let appointments = repos.appointments.find_by_user(recipient.id).await.unwrap();
    assert_eq!(appointments.len(), 1);
    let rb = repos.responses.find_by_id(rb.id).await.unwrap().unwrap();
    assert_eq!(rb.status, ResponseStatus::Pending);
}

#[tokio::test]
async fn test_match_with_unknown_response_is_rejected() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;

    let result = repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: a.id,
            kind: MatchKind::Response(ResponseId::new()),
            appointment: appointment_for(&req, a.id),
        })
        .await
        .unwrap();
    assert!(result.is_none());
    let req = repos.requests.find_by_id(req.id).await.unwrap().unwrap();
    assert_eq!(req.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_duplicate_response_conflicts() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;
    repos.responses.create(a.id, req.id).await.unwrap();
    let err = repos.responses.create(a.id, req.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_stock_delta_floor() {
    let (repos, hospital, _) = setup().await;
    let key = StockKey::blood(hospital.id, BloodGroup::APositive);

    let err = repos.inventory.apply_delta(&key, -1).await.unwrap_err();
    assert_eq!(err.message, "Cannot reduce non-existent stock");

    repos.inventory.apply_delta(&key, 2).await.unwrap();
    assert!(repos.inventory.apply_delta(&key, -3).await.is_err());
    let unit = repos.inventory.find(&key).await.unwrap().unwrap();
    assert_eq!(unit.units_available, 2);

    let unit = repos.inventory.apply_delta(&key, -2).await.unwrap();
    assert_eq!(unit.units_available, 0);
}

#[tokio::test]
async fn test_stock_counts_reject_overflow() {
    let (repos, hospital, _) = setup().await;
    let key = StockKey::blood(hospital.id, BloodGroup::APositive);
    repos.inventory.apply_delta(&key, i32::MAX).await.unwrap();
    let err = repos.inventory.apply_delta(&key, 1).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let intake = PlasmaIntake {
        hospital_id: hospital.id,
        blood_group: BloodGroup::ONegative,
        units: i32::MAX,
        expiry_date: Utc::now() + Duration::days(10),
        source_unit_id: None,
        separation_date: None,
    };
    repos.inventory.register_plasma(&intake).await.unwrap();
    let err = repos.inventory.register_plasma(&intake).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Stock count exceeds the supported maximum");

    let unit = repos
        .inventory
        .find(&StockKey::plasma(hospital.id, BloodGroup::ONegative))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unit.units_available, i32::MAX);
}

#[tokio::test]
async fn test_plasma_register_keeps_earliest_expiry() {
    let (repos, hospital, _) = setup().await;
    let soon = Utc::now() + Duration::days(2);
    let later = Utc::now() + Duration::days(20);
    let intake = |units, expiry| PlasmaIntake {
        hospital_id: hospital.id,
        blood_group: BloodGroup::ONegative,
        units,
        expiry_date: expiry,
        source_unit_id: None,
        separation_date: None,
    };

    repos.inventory.register_plasma(&intake(3, later)).await.unwrap();
    let unit = repos.inventory.register_plasma(&intake(2, soon)).await.unwrap();
    assert_eq!(unit.units_available, 5);
    assert_eq!(unit.expiry_date, Some(soon));
}

#[tokio::test]
async fn test_donation_commit_applies_every_effect() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;
    let committed = repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: a.id,
            kind: MatchKind::Direct,
            appointment: appointment_for(&req, a.id),
        })
        .await
        .unwrap()
        .unwrap();

    let now = Utc::now();
    let receipt = repos
        .ledger
        .commit_donation(&DonationCommit {
            appointment: Some(AppointmentTransition {
                appointment_id: committed.appointment.id,
                from: AppointmentStatus::allowed_sources(AppointmentStatus::Donated),
                verification: None,
            }),
            stock: StockKey::blood(hospital.id, BloodGroup::BPositive),
            units: 1,
            donation: CreateDonation {
                donor_id: a.id,
                blood_group: BloodGroup::BPositive,
                units: 1,
                hospital_id: hospital.id,
                hospital_name: hospital.name.clone(),
                appointment_id: Some(committed.appointment.id),
                request_id: Some(req.id),
                donation_date: now,
            },
            request: Some(RequestCompletion {
                request_id: req.id,
                required: false,
            }),
            audit: CreateAuditLogEntry::new(
                a.id,
                actions::DONATION_COMPLETED,
                targets::APPOINTMENT,
                Some(committed.appointment.id.into_uuid()),
                json!({}),
            ),
        })
        .await
        .unwrap()
        .expect("donation commits");

    assert_eq!(receipt.inventory.units_available, 1);
    assert_eq!(
        receipt.appointment.map(|a| a.status),
        Some(AppointmentStatus::Donated)
    );
    assert_eq!(
        receipt.request.map(|r| r.status),
        Some(RequestStatus::Completed)
    );
    let donor = repos.users.find_by_id(a.id).await.unwrap().unwrap();
    assert_eq!(donor.last_donation_date, Some(now));
    assert_eq!(repos.donations.count_by_donor(a.id).await.unwrap(), 1);
    assert_eq!(repos.audit.find_by_actor(a.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_required_completion_guard_aborts_whole_commit() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;

    let result = repos
        .ledger
        .commit_donation(&DonationCommit {
            appointment: None,
            stock: StockKey::blood(hospital.id, BloodGroup::BPositive),
            units: 1,
            donation: CreateDonation {
                donor_id: a.id,
                blood_group: BloodGroup::BPositive,
                units: 1,
                hospital_id: hospital.id,
                hospital_name: hospital.name.clone(),
                appointment_id: None,
                request_id: Some(req.id),
                donation_date: Utc::now(),
            },
            request: Some(RequestCompletion {
                request_id: req.id,
                required: true,
            }),
            audit: CreateAuditLogEntry::new(
                recipient.id,
                actions::DONATION_COMPLETED,
                targets::BLOOD_REQUEST,
                Some(req.id.into_uuid()),
                json!({}),
            ),
        })
        .await
        .unwrap();

    assert!(result.is_none());
    let key = StockKey::blood(hospital.id, BloodGroup::BPositive);
    assert!(repos.inventory.find(&key).await.unwrap().is_none());
    assert_eq!(repos.donations.count_by_donor(a.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_request_round_trip_keeps_fields() {
    let (repos, hospital, recipient) = setup().await;
    let details = RequestDetails {
        purpose: Some("Surgery".to_string()),
        patient_name: Some("Meera".to_string()),
        patient_age: Some(42),
        hemoglobin_level: Some(7.5),
        ..RequestDetails::default()
    };
    let created = repos
        .requests
        .create(&CreateBloodRequest {
            recipient_id: recipient.id,
            blood_group: BloodGroup::AbNegative,
            units_needed: Some(3),
            urgency: Urgency::High,
            hospital_id: hospital.id,
            hospital_name: hospital.name.clone(),
            hospital_address: Some("12 Lake Road".to_string()),
            details: details.clone(),
        })
        .await
        .unwrap();

    let fetched = repos.requests.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.blood_group, BloodGroup::AbNegative);
    assert_eq!(fetched.units_needed, Some(3));
    assert_eq!(fetched.urgency, Urgency::High);
    assert_eq!(fetched.hospital_address.as_deref(), Some("12 Lake Road"));
    assert_eq!(fetched.details, details);
    assert_eq!(fetched.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_donation_by_unbound_donor_leaves_request_open() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;
    let b = donor(&repos, "b@example.com", BloodGroup::APositive).await;
    let committed = repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: a.id,
            kind: MatchKind::Direct,
            appointment: appointment_for(&req, a.id),
        })
        .await
        .unwrap()
        .unwrap();
    let stray = repos
        .appointments
        .create(&appointment_for(&req, b.id))
        .await
        .unwrap();

    // A required completion for the wrong donor aborts everything.
    let aborted = repos
        .ledger
        .commit_donation(&donation_by(&req, b.id, None, true))
        .await
        .unwrap();
    assert!(aborted.is_none());
    assert_eq!(repos.donations.count_by_donor(b.id).await.unwrap(), 0);

    // An optional one records B's donation but leaves A's binding alone.
    let receipt = repos
        .ledger
        .commit_donation(&donation_by(&req, b.id, Some(stray.id), false))
        .await
        .unwrap()
        .unwrap();
    assert!(receipt.request.is_none());
    assert_eq!(
        receipt.appointment.map(|a| a.status),
        Some(AppointmentStatus::Donated)
    );

    let req_after = repos.requests.find_by_id(req.id).await.unwrap().unwrap();
    assert_eq!(req_after.status, RequestStatus::Accepted);
    assert_eq!(req_after.donor_id, Some(a.id));
    let a_appointment = repos
        .appointments
        .find_by_id(committed.appointment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a_appointment.status, AppointmentStatus::Scheduled);
    assert!(a_appointment.verified_by.is_none());
}

#[tokio::test]
async fn test_request_cancel_closes_open_appointments() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::BPositive).await;
    let committed = repos
        .matches
        .commit_match(&MatchCommit {
            request_id: req.id,
            donor_id: a.id,
            kind: MatchKind::Direct,
            appointment: appointment_for(&req, a.id),
        })
        .await
        .unwrap()
        .unwrap();

    let cancelled = repos
        .requests
        .cancel(req.id, &RequestStatus::CANCELLABLE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.request.status, RequestStatus::Cancelled);
    assert_eq!(cancelled.closed_appointments, 1);
    let appointment = repos
        .appointments
        .find_by_id(committed.appointment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Cancelled);

    let again = repos
        .requests
        .cancel(req.id, &RequestStatus::CANCELLABLE)
        .await
        .unwrap();
    assert!(again.is_none());
}

#[tokio::test]
async fn test_hospital_directory_and_delete_guard() {
    let (repos, hospital, _) = setup().await;
    let pending = repos
        .hospitals
        .create(&CreateHospital {
            verified: false,
            ..CreateHospital::verified("Avalon Clinic", "hello@avalon.org")
        })
        .await
        .unwrap();

    let verified = repos.hospitals.find_verified().await.unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].id, hospital.id);

    let updated = repos
        .hospitals
        .set_verified(pending.id, true)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.verified);
    let names: Vec<String> = repos
        .hospitals
        .find_verified()
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names, vec!["Avalon Clinic", "City General"]);
    assert!(
        repos
            .hospitals
            .set_verified(lifeshare_core::types::HospitalId::new(), true)
            .await
            .unwrap()
            .is_none()
    );

    let mut staff = CreateUser::new(UserRole::HospitalStaff, "Nina", "nina@avalon.org");
    staff.hospital_id = Some(pending.id);
    repos.users.create(&staff).await.unwrap();
    let err = repos.hospitals.delete(pending.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let spare = repos
        .hospitals
        .create(&CreateHospital::verified("Spare Wing", "spare@example.org"))
        .await
        .unwrap();
    assert!(repos.hospitals.delete(spare.id).await.unwrap());
    assert!(!repos.hospitals.delete(spare.id).await.unwrap());
}

#[tokio::test]
async fn test_counts_for_dashboard() {
    let (repos, hospital, recipient) = setup().await;
    let req = request(&repos, &hospital, &recipient).await;
    let a = donor(&repos, "a@example.com", BloodGroup::APositive).await;
    donor(&repos, "b@example.com", BloodGroup::APositive).await;

    assert_eq!(repos.users.count_by_role(None).await.unwrap(), 3);
    assert_eq!(repos.users.count_by_role(Some(UserRole::Donor)).await.unwrap(), 2);
    assert_eq!(repos.users.count_by_role(Some(UserRole::Admin)).await.unwrap(), 0);

    let before = Utc::now() - Duration::seconds(1);
    repos
        .ledger
        .commit_donation(&donation_by(&req, a.id, None, false))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(repos.donations.count_since(None).await.unwrap(), 1);
    assert_eq!(repos.donations.count_since(Some(before)).await.unwrap(), 1);
    assert_eq!(
        repos
            .donations
            .count_since(Some(Utc::now() + Duration::hours(1)))
            .await
            .unwrap(),
        0
    );
}
