//! Request, response and appointment lifecycle against the in-memory store.

mod common;

use chrono::{Duration, Utc};

use common::{Harness, new_request};
use lifeshare_core::error::ErrorKind;
use lifeshare_core::types::PageRequest;
use lifeshare_entity::BloodGroup;
use lifeshare_entity::appointment::AppointmentStatus;
use lifeshare_entity::inventory::{InventoryKind, StockKey};
use lifeshare_entity::notification::NotificationKind;
use lifeshare_entity::request::{RequestStatus, Urgency};
use lifeshare_entity::response::ResponseStatus;
use lifeshare_entity::user::StaffRole;
use lifeshare_service::lifecycle::{BookAppointment, ResponseDecision};

#[tokio::test]
async fn test_matching_notifies_exact_group_only() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    h.donor("o-neg-1@example.com", BloodGroup::ONegative).await;
    h.donor("o-neg-2@example.com", BloodGroup::ONegative).await;
    h.donor("o-pos@example.com", BloodGroup::OPositive).await;

    let request = h.request(&recipient, BloodGroup::ONegative).await;
    let report = h
        .services
        .matching
        .notify_matching_donors(&request)
        .await
        .unwrap();

    assert_eq!(report.total_matching_donors, 2);
    assert_eq!(report.notified_count, 2);
    assert_eq!(report.failed_count, 0);
    assert_eq!(h.mailer.sent_to("o-pos@example.com"), 0);
}

#[tokio::test]
async fn test_matching_with_no_donors_succeeds_with_zero() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let request = h.request(&recipient, BloodGroup::AbNegative).await;

    let report = h
        .services
        .matching
        .notify_matching_donors(&request)
        .await
        .unwrap();

    assert_eq!(report.notified_count, 0);
    assert_eq!(report.total_matching_donors, 0);
    assert!(h.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_matching_counts_failed_sends_without_aborting() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    h.donor("bounce@example.com", BloodGroup::APositive).await;
    h.donor("ok@example.com", BloodGroup::APositive).await;
    let request = h.request(&recipient, BloodGroup::APositive).await;

    let report = h
        .services
        .matching
        .notify_matching_donors(&request)
        .await
        .unwrap();

    assert_eq!(report.notified_count, 1);
    assert_eq!(report.failed_count, 1);
    assert_eq!(h.mailer.sent_to("ok@example.com"), 1);
}

#[tokio::test]
async fn test_created_request_reads_back_unchanged() {
    let h = Harness::new().await;
    let (recipient_user, recipient) = h.recipient("ravi@example.com").await;
    let mut input = new_request(h.hospital.id, BloodGroup::BNegative);
    input.units_needed = Some(3);
    input.urgency = Urgency::Critical;
    input.details.doctor_name = Some("Dr. Rao".to_string());
    input.details.required_date = Some(Utc::now() + Duration::days(2));

    let created = h
        .services
        .requests
        .create(&recipient, input.clone())
        .await
        .unwrap();
    assert_eq!(created.message, "Request created");

    let fetched = h.services.requests.get(&recipient, created.data.id).await.unwrap();
    assert_eq!(fetched.recipient_id, recipient_user.id);
    assert_eq!(fetched.blood_group, input.blood_group);
    assert_eq!(fetched.units_needed, input.units_needed);
    assert_eq!(fetched.urgency, input.urgency);
    assert_eq!(fetched.hospital_id, h.hospital.id);
    assert_eq!(fetched.hospital_name, h.hospital.name);
    assert_eq!(fetched.details, input.details);
    assert_eq!(fetched.status, RequestStatus::Pending);
    assert!(fetched.donor_id.is_none());
}

#[tokio::test]
async fn test_create_rejects_unknown_hospital_and_zero_units() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;

    let mut missing = new_request(h.hospital.id, BloodGroup::APositive);
    missing.hospital_id = lifeshare_core::types::HospitalId::new();
    let err = h.services.requests.create(&recipient, missing).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvedDependency);

    let mut zero = new_request(h.hospital.id, BloodGroup::APositive);
    zero.units_needed = Some(0);
    let err = h.services.requests.create(&recipient, zero).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert!(h.services.requests.list_mine(&recipient).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_only_recipients_create_requests() {
    let h = Harness::new().await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::APositive).await;
    let err = h
        .services
        .requests
        .create(&donor, new_request(h.hospital.id, BloodGroup::APositive))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_direct_accept_binds_donor_and_schedules_appointment() {
    let h = Harness::new().await;
    let (recipient_user, recipient) = h.recipient("ravi@example.com").await;
    let (donor_user, donor) = h.donor("dev@example.com", BloodGroup::APositive).await;
    let request = h.request(&recipient, BloodGroup::APositive).await;

    let outcome = h.services.requests.accept(&donor, request.id).await.unwrap();
    let matched = outcome.data;

    assert_eq!(matched.request.status, RequestStatus::Accepted);
    assert_eq!(matched.request.donor_id, Some(donor_user.id));
    assert_eq!(matched.request.donor_response, ResponseStatus::Accepted);
    assert_eq!(matched.request.recipient_status, ResponseStatus::Accepted);
    assert_eq!(matched.appointment.donor_id, donor_user.id);
    assert_eq!(matched.appointment.request_id, Some(request.id));
    assert_eq!(matched.appointment.status, AppointmentStatus::Scheduled);

    let recipient_inbox = h
        .repos
        .notifications
        .find_by_user(recipient_user.id, &PageRequest::new(1, 20))
        .await
        .unwrap();
    assert!(
        recipient_inbox
            .items
            .iter()
            .any(|n| n.kind == NotificationKind::DonorAccepted)
    );
    assert_eq!(
        h.repos.notifications.count_unread(donor_user.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_accepting_non_pending_request_conflicts() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, first) = h.donor("first@example.com", BloodGroup::APositive).await;
    let (_, second) = h.donor("second@example.com", BloodGroup::APositive).await;
    let request = h.request(&recipient, BloodGroup::APositive).await;

    h.services.requests.accept(&first, request.id).await.unwrap();
    let err = h.services.requests.accept(&second, request.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_concurrent_direct_accepts_have_one_winner() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, first) = h.donor("first@example.com", BloodGroup::APositive).await;
    let (_, second) = h.donor("second@example.com", BloodGroup::APositive).await;
    let request = h.request(&recipient, BloodGroup::APositive).await;

    let (a, b) = tokio::join!(
        h.services.requests.accept(&first, request.id),
        h.services.requests.accept(&second, request.id),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);

    let appointments = h
        .repos
        .appointments
        .find_by_hospital(h.hospital.id)
        .await
        .unwrap();
    assert_eq!(appointments.len(), 1);
}

#[tokio::test]
async fn test_response_accept_declines_pending_siblings() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (donor_a, a) = h.donor("a@example.com", BloodGroup::BPositive).await;
    let (_, b) = h.donor("b@example.com", BloodGroup::BPositive).await;
    let request = h.request(&recipient, BloodGroup::BPositive).await;

    let response_a = h.services.responses.create(&a, request.id).await.unwrap().data;
    let response_b = h.services.responses.create(&b, request.id).await.unwrap().data;

    let outcome = h
        .services
        .responses
        .decide(&recipient, response_a.id, "accepted")
        .await
        .unwrap();
    let ResponseDecision::Matched(matched) = outcome.data else {
        panic!("expected a match");
    };

    assert_eq!(matched.request.status, RequestStatus::Matched);
    assert_eq!(matched.request.donor_id, Some(donor_a.id));
    assert_eq!(matched.declined_responses, 1);
    assert_eq!(matched.appointment.donor_id, donor_a.id);
    assert_eq!(matched.appointment.request_id, Some(request.id));

    let sibling = h
        .repos
        .responses
        .find_by_id(response_b.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sibling.status, ResponseStatus::Declined);
}

#[tokio::test]
async fn test_response_accept_after_direct_accept_conflicts() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, a) = h.donor("a@example.com", BloodGroup::BPositive).await;
    let (_, b) = h.donor("b@example.com", BloodGroup::BPositive).await;
    let request = h.request(&recipient, BloodGroup::BPositive).await;

    let response_a = h.services.responses.create(&a, request.id).await.unwrap().data;
    h.services.requests.accept(&b, request.id).await.unwrap();

    let err = h
        .services
        .responses
        .decide(&recipient, response_a.id, "accepted")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let appointments = h.repos.appointments.find_by_hospital(h.hospital.id).await.unwrap();
    assert_eq!(appointments.len(), 1);
}

#[tokio::test]
async fn test_duplicate_response_conflicts() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("a@example.com", BloodGroup::BPositive).await;
    let request = h.request(&recipient, BloodGroup::BPositive).await;

    h.services.responses.create(&donor, request.id).await.unwrap();
    let err = h.services.responses.create(&donor, request.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "You have already responded to this request");
}

#[tokio::test]
async fn test_invalid_decision_is_rejected() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("a@example.com", BloodGroup::BPositive).await;
    let request = h.request(&recipient, BloodGroup::BPositive).await;
    let response = h.services.responses.create(&donor, request.id).await.unwrap().data;

    let err = h
        .services
        .responses
        .decide(&recipient, response.id, "maybe")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_staff_donations_create_then_increment_inventory_row() {
    let h = Harness::new().await;
    let (_, nurse) = h.staff("nurse@citygeneral.org", StaffRole::Nurse).await;
    let key = StockKey::blood(h.hospital.id, BloodGroup::BPositive);

    for email in ["d1@example.com", "d2@example.com"] {
        let (_, donor) = h.donor(email, BloodGroup::BPositive).await;
        let appointment = h
            .services
            .appointments
            .book(
                &donor,
                BookAppointment {
                    hospital_id: h.hospital.id,
                    appointment_date: Utc::now(),
                    appointment_time: Some("10:00".to_string()),
                    request_id: None,
                    notes: None,
                },
            )
            .await
            .unwrap()
            .data;
        h.services
            .appointments
            .staff_verify(&nurse, appointment.id, AppointmentStatus::Donated, None)
            .await
            .unwrap();
    }

    let unit = h.repos.inventory.find(&key).await.unwrap().unwrap();
    assert_eq!(unit.units_available, 2);
    assert_eq!(
        h.repos
            .inventory
            .find_by_hospital(h.hospital.id, InventoryKind::Blood)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_donation_effects_land_together() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (donor_user, donor) = h.donor("dev@example.com", BloodGroup::OPositive).await;
    let (nurse_user, nurse) = h.staff("nurse@citygeneral.org", StaffRole::Nurse).await;
    let request = h.request(&recipient, BloodGroup::OPositive).await;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;

    let outcome = h
        .services
        .appointments
        .staff_verify(
            &nurse,
            matched.appointment.id,
            AppointmentStatus::Donated,
            Some("Routine".to_string()),
        )
        .await
        .unwrap();
    let update = outcome.data;

    assert_eq!(update.appointment.status, AppointmentStatus::Donated);
    assert_eq!(update.appointment.verified_by, Some(nurse_user.id));
    assert_eq!(update.inventory.as_ref().map(|u| u.units_available), Some(1));
    assert_eq!(
        update.request.as_ref().map(|r| r.status),
        Some(RequestStatus::Completed)
    );

    let donations = h.repos.donations.find_by_donor(donor_user.id).await.unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].request_id, Some(request.id));
    let donor_after = h.repos.users.find_by_id(donor_user.id).await.unwrap().unwrap();
    assert!(donor_after.last_donation_date.is_some());
    assert_eq!(h.repos.audit.find_by_actor(nurse_user.id).await.unwrap().len(), 1);

    // The appointment is closed; a second verification writes nothing.
    let err = h
        .services
        .appointments
        .staff_verify(&nurse, matched.appointment.id, AppointmentStatus::Donated, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    let unit = h
        .repos
        .inventory
        .find(&StockKey::blood(h.hospital.id, BloodGroup::OPositive))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unit.units_available, 1);
    assert_eq!(h.repos.donations.count_by_donor(donor_user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_staff_cannot_verify_other_hospitals_appointments() {
    let h = Harness::new().await;
    let other = h.other_hospital().await;
    let (_, outsider) = h.staff_at(&other, "nurse@lakeside.org", StaffRole::Nurse).await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::OPositive).await;
    let request = h.request(&recipient, BloodGroup::OPositive).await;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;

    let err = h
        .services
        .appointments
        .staff_verify(&outsider, matched.appointment.id, AppointmentStatus::Missed, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "Staff can only manage appointments for their hospital");
}

#[tokio::test]
async fn test_staff_verification_accepts_only_terminal_outcomes() {
    let h = Harness::new().await;
    let (nurse_user, nurse) = h.staff("nurse@citygeneral.org", StaffRole::Nurse).await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::OPositive).await;
    let request = h.request(&recipient, BloodGroup::OPositive).await;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;

    let err = h
        .services
        .appointments
        .staff_verify(&nurse, matched.appointment.id, AppointmentStatus::Cancelled, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let missed = h
        .services
        .appointments
        .staff_verify(&nurse, matched.appointment.id, AppointmentStatus::Missed, None)
        .await
        .unwrap()
        .data;
    assert_eq!(missed.appointment.status, AppointmentStatus::Missed);
    assert!(missed.donation.is_none());
    assert!(missed.inventory.is_none());
    assert_eq!(missed.appointment.verified_by, Some(nurse_user.id));
    assert_eq!(missed.appointment.verified_hospital_id, Some(h.hospital.id));
    assert!(missed.appointment.verified_at.is_some());

    let stock = h
        .repos
        .inventory
        .find_by_hospital(h.hospital.id, InventoryKind::Blood)
        .await
        .unwrap();
    assert!(stock.is_empty());
    let request_after = h.repos.requests.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(request_after.status, RequestStatus::Accepted);
}

#[tokio::test]
async fn test_hospital_marks_bound_request_complete() {
    let h = Harness::new().await;
    let hospital = h.hospital_account().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::AbPositive).await;
    let mut input = new_request(h.hospital.id, BloodGroup::AbPositive);
    input.units_needed = Some(2);
    let request = h.services.requests.create(&recipient, input).await.unwrap().data;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;

    let bound = h.services.completion.accepted_requests(&hospital).await.unwrap();
    assert_eq!(bound.len(), 1);

    let done = h
        .services
        .completion
        .mark_complete(&hospital, request.id)
        .await
        .unwrap()
        .data;
    assert_eq!(done.request.status, RequestStatus::Completed);
    assert_eq!(done.inventory.units_available, 2);

    let appointment = h
        .repos
        .appointments
        .find_by_id(matched.appointment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Donated);

    let err = h
        .services
        .completion
        .mark_complete(&hospital, request.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_booking_requires_verified_hospital() {
    let h = Harness::new().await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::APositive).await;
    let mut unverified =
        lifeshare_entity::hospital::CreateHospital::verified("Pop-up Camp", "camp@example.org");
    unverified.verified = false;
    let camp = h.repos.hospitals.create(&unverified).await.unwrap();

    let err = h
        .services
        .appointments
        .book(
            &donor,
            BookAppointment {
                hospital_id: camp.id,
                appointment_date: Utc::now(),
                appointment_time: None,
                request_id: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_attendee_can_cancel_and_confirm() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::APositive).await;
    let (_, stranger) = h.donor("stranger@example.com", BloodGroup::APositive).await;
    let request = h.request(&recipient, BloodGroup::APositive).await;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;
    let id = matched.appointment.id;

    let confirmed = h.services.appointments.confirm(&recipient, id).await.unwrap().data;
    assert!(confirmed.confirmed);
    assert_eq!(confirmed.status, AppointmentStatus::Scheduled);

    let err = h
        .services
        .appointments
        .attendee_update(&stranger, id, AppointmentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let cancelled = h
        .services
        .appointments
        .attendee_update(&donor, id, AppointmentStatus::Cancelled)
        .await
        .unwrap()
        .data;
    assert_eq!(cancelled.appointment.status, AppointmentStatus::Cancelled);

    let err = h.services.appointments.confirm(&donor, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_cancel_is_limited_to_owner_and_open_requests() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, other) = h.recipient("other@example.com").await;
    let request = h.request(&recipient, BloodGroup::APositive).await;

    let err = h.services.requests.cancel(&other, request.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let cancelled = h.services.requests.cancel(&recipient, request.id).await.unwrap().data;
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let err = h.services.requests.cancel(&recipient, request.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_donor_feed_lists_pending_for_own_group() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::ANegative).await;
    h.request(&recipient, BloodGroup::ANegative).await;
    h.request(&recipient, BloodGroup::BNegative).await;

    let feed = h.services.requests.donor_feed(&donor).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].blood_group, BloodGroup::ANegative);
}

fn general_booking(hospital_id: lifeshare_core::types::HospitalId) -> BookAppointment {
    BookAppointment {
        hospital_id,
        appointment_date: Utc::now(),
        appointment_time: None,
        request_id: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_booking_rejects_request_bound_to_another_donor() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, bound) = h.donor("bound@example.com", BloodGroup::OPositive).await;
    let (_, other) = h.donor("other@example.com", BloodGroup::APositive).await;
    let request = h.request(&recipient, BloodGroup::OPositive).await;
    h.services.requests.accept(&bound, request.id).await.unwrap();

    let err = h
        .services
        .appointments
        .book(
            &other,
            BookAppointment {
                request_id: Some(request.id),
                ..general_booking(h.hospital.id)
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The bound donor may still book against it.
    let own = h
        .services
        .appointments
        .book(
            &bound,
            BookAppointment {
                request_id: Some(request.id),
                ..general_booking(h.hospital.id)
            },
        )
        .await
        .unwrap()
        .data;
    assert_eq!(own.request_id, Some(request.id));
}

#[tokio::test]
async fn test_unbound_donor_donation_does_not_complete_request() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (bound_user, bound) = h.donor("bound@example.com", BloodGroup::OPositive).await;
    let (early_user, early) = h.donor("early@example.com", BloodGroup::APositive).await;
    let (_, nurse) = h.staff("nurse@citygeneral.org", StaffRole::Nurse).await;
    let request = h.request(&recipient, BloodGroup::OPositive).await;

    // Booked while the request was still open to anyone.
    let early_booking = h
        .services
        .appointments
        .book(
            &early,
            BookAppointment {
                request_id: Some(request.id),
                ..general_booking(h.hospital.id)
            },
        )
        .await
        .unwrap()
        .data;
    let matched = h.services.requests.accept(&bound, request.id).await.unwrap().data;

    let update = h
        .services
        .appointments
        .attendee_update(&early, early_booking.id, AppointmentStatus::Donated)
        .await
        .unwrap()
        .data;
    assert!(update.request.is_none());
    let donations = h.repos.donations.find_by_donor(early_user.id).await.unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].blood_group, BloodGroup::APositive);

    let request_after = h.repos.requests.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(request_after.status, RequestStatus::Accepted);
    assert_eq!(request_after.donor_id, Some(bound_user.id));
    let bound_appointment = h
        .repos
        .appointments
        .find_by_id(matched.appointment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bound_appointment.status, AppointmentStatus::Scheduled);

    // The bound donor's verified donation is what completes it.
    let verified = h
        .services
        .appointments
        .staff_verify(&nurse, matched.appointment.id, AppointmentStatus::Donated, None)
        .await
        .unwrap()
        .data;
    assert_eq!(
        verified.request.map(|r| r.status),
        Some(RequestStatus::Completed)
    );
    let bound_after = h.repos.users.find_by_id(bound_user.id).await.unwrap().unwrap();
    assert!(bound_after.last_donation_date.is_some());
}

#[tokio::test]
async fn test_donor_reports_own_donation() {
    let h = Harness::new().await;
    let (donor_user, donor) = h.donor("dev@example.com", BloodGroup::BNegative).await;
    let (_, stranger) = h.donor("stranger@example.com", BloodGroup::BNegative).await;
    let appointment = h
        .services
        .appointments
        .book(&donor, general_booking(h.hospital.id))
        .await
        .unwrap()
        .data;

    let err = h
        .services
        .appointments
        .attendee_update(&stranger, appointment.id, AppointmentStatus::Donated)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let update = h
        .services
        .appointments
        .attendee_update(&donor, appointment.id, AppointmentStatus::Donated)
        .await
        .unwrap()
        .data;
    assert_eq!(update.appointment.status, AppointmentStatus::Donated);
    assert!(update.appointment.verified_by.is_none());
    assert_eq!(update.inventory.map(|u| u.units_available), Some(1));
    assert_eq!(h.repos.donations.count_by_donor(donor_user.id).await.unwrap(), 1);
    let donor_after = h.repos.users.find_by_id(donor_user.id).await.unwrap().unwrap();
    assert!(donor_after.last_donation_date.is_some());

    let err = h
        .services
        .appointments
        .attendee_update(&donor, appointment.id, AppointmentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_hospital_account_walks_appointment_to_donated() {
    let h = Harness::new().await;
    let hospital = h.hospital_account().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (donor_user, donor) = h.donor("dev@example.com", BloodGroup::AbNegative).await;
    let request = h.request(&recipient, BloodGroup::AbNegative).await;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;
    let id = matched.appointment.id;

    let checked_in = h
        .services
        .appointments
        .hospital_update_status(&hospital, id, AppointmentStatus::CheckedIn, None)
        .await
        .unwrap()
        .data;
    assert_eq!(checked_in.appointment.status, AppointmentStatus::CheckedIn);
    assert!(checked_in.donation.is_none());

    // A checked-in donor can no longer be marked as a no-show.
    let err = h
        .services
        .appointments
        .hospital_update_status(&hospital, id, AppointmentStatus::Missed, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let donated = h
        .services
        .appointments
        .hospital_update_status(&hospital, id, AppointmentStatus::Donated, None)
        .await
        .unwrap()
        .data;
    assert_eq!(donated.appointment.status, AppointmentStatus::Donated);
    assert_eq!(donated.appointment.verified_by, Some(hospital.user_id));
    assert_eq!(donated.inventory.map(|u| u.units_available), Some(1));
    assert_eq!(
        donated.request.map(|r| r.status),
        Some(RequestStatus::Completed)
    );
    assert_eq!(h.repos.donations.count_by_donor(donor_user.id).await.unwrap(), 1);
    let unit = h
        .repos
        .inventory
        .find(&StockKey::blood(h.hospital.id, BloodGroup::AbNegative))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unit.units_available, 1);
}

#[tokio::test]
async fn test_cancelling_bound_request_closes_its_appointment() {
    let h = Harness::new().await;
    let (_, recipient) = h.recipient("ravi@example.com").await;
    let (_, donor) = h.donor("dev@example.com", BloodGroup::OPositive).await;
    let (_, nurse) = h.staff("nurse@citygeneral.org", StaffRole::Nurse).await;
    let request = h.request(&recipient, BloodGroup::OPositive).await;
    let matched = h.services.requests.accept(&donor, request.id).await.unwrap().data;

    let cancelled = h.services.requests.cancel(&recipient, request.id).await.unwrap().data;
    assert_eq!(cancelled.status, RequestStatus::Cancelled);
    let appointment = h
        .repos
        .appointments
        .find_by_id(matched.appointment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Cancelled);

    let err = h
        .services
        .appointments
        .staff_verify(&nurse, matched.appointment.id, AppointmentStatus::Donated, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(
        h.repos
            .inventory
            .find(&StockKey::blood(h.hospital.id, BloodGroup::OPositive))
            .await
            .unwrap()
            .is_none()
    );
}
