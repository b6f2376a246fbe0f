//! Integration tests for the request, response and appointment lifecycle.

use axum::http::StatusCode;

use lifeshare_entity::BloodGroup;
use lifeshare_entity::user::StaffRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_zero_units_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.recipient("asha@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/requests",
            Some(serde_json::json!({
                "blood_group": "O-",
                "units_needed": 0,
                "hospital_id": app.hospital.id,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_direct_accept_then_complete() {
    let app = TestApp::new().await;
    let (_, recipient) = app.recipient("asha@example.com").await;
    let (_, donor) = app.donor("ravi@example.com", BloodGroup::ONegative).await;
    let (_, staff) = app.staff("nurse@citygeneral.org", StaffRole::Nurse).await;

    let request_id = app.create_request(&recipient).await;

    let feed = app
        .request("GET", "/api/requests/feed", None, Some(&donor))
        .await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.body["data"][0]["id"], request_id.as_str());

    let accepted = app
        .request(
            "POST",
            &format!("/api/requests/{request_id}/accept"),
            None,
            Some(&donor),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK, "{:?}", accepted.body);
    assert_eq!(accepted.body["data"]["data"]["request"]["status"], "accepted");
    assert_eq!(
        accepted.body["data"]["data"]["appointment"]["status"],
        "scheduled"
    );

    let bound = app
        .request("GET", "/api/hospital/requests/accepted", None, Some(&staff))
        .await;
    assert_eq!(bound.body["data"].as_array().map(Vec::len), Some(1));

    let completed = app
        .request(
            "POST",
            &format!("/api/hospital/requests/{request_id}/complete"),
            None,
            Some(&staff),
        )
        .await;
    assert_eq!(completed.status, StatusCode::OK, "{:?}", completed.body);
    assert_eq!(completed.body["data"]["message"], "Donation marked as completed");
    assert_eq!(completed.body["data"]["data"]["request"]["status"], "completed");

    let count = app
        .request("GET", "/api/donations/mine/count", None, Some(&donor))
        .await;
    assert_eq!(count.body["data"]["count"], 1);

    let stock = app
        .request("GET", "/api/hospital/stock", None, Some(&staff))
        .await;
    assert_eq!(stock.body["data"][0]["blood_group"], "O-");
    assert_eq!(stock.body["data"][0]["units_available"], 2);
    assert_eq!(stock.body["data"][0]["level"], "low");
}

#[tokio::test]
async fn test_second_accept_conflicts() {
    let app = TestApp::new().await;
    let (_, recipient) = app.recipient("asha@example.com").await;
    let (_, first) = app.donor("ravi@example.com", BloodGroup::ONegative).await;
    let (_, second) = app.donor("kiran@example.com", BloodGroup::ONegative).await;

    let request_id = app.create_request(&recipient).await;
    let path = format!("/api/requests/{request_id}/accept");

    let won = app.request("POST", &path, None, Some(&first)).await;
    assert_eq!(won.status, StatusCode::OK);

    let lost = app.request("POST", &path, None, Some(&second)).await;
    assert_eq!(lost.status, StatusCode::CONFLICT);
    assert_eq!(lost.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_response_accept_matches_request() {
    let app = TestApp::new().await;
    let (_, recipient) = app.recipient("asha@example.com").await;
    let (_, donor) = app.donor("ravi@example.com", BloodGroup::ONegative).await;

    let request_id = app.create_request(&recipient).await;

    let responded = app
        .request(
            "POST",
            "/api/responses",
            Some(serde_json::json!({ "request_id": request_id })),
            Some(&donor),
        )
        .await;
    assert_eq!(responded.status, StatusCode::OK, "{:?}", responded.body);
    let response_id = responded.body["data"]["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let duplicate = app
        .request(
            "POST",
            "/api/responses",
            Some(serde_json::json!({ "request_id": request_id })),
            Some(&donor),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let mine = app
        .request("GET", "/api/responses/mine", None, Some(&recipient))
        .await;
    assert_eq!(mine.body["data"].as_array().map(Vec::len), Some(1));

    let invalid = app
        .request(
            "PATCH",
            &format!("/api/responses/{response_id}"),
            Some(serde_json::json!({ "status": "maybe" })),
            Some(&recipient),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let decided = app
        .request(
            "PATCH",
            &format!("/api/responses/{response_id}"),
            Some(serde_json::json!({ "status": "accepted" })),
            Some(&recipient),
        )
        .await;
    assert_eq!(decided.status, StatusCode::OK, "{:?}", decided.body);
    assert_eq!(decided.body["data"]["data"]["request"]["status"], "matched");

    let appointments = app
        .request("GET", "/api/appointments/mine", None, Some(&donor))
        .await;
    assert_eq!(appointments.body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_staff_verification_records_donation() {
    let app = TestApp::new().await;
    let (_, donor) = app.donor("ravi@example.com", BloodGroup::BNegative).await;
    let (_, staff) = app.staff("lab@citygeneral.org", StaffRole::Technician).await;

    let booked = app
        .request(
            "POST",
            "/api/appointments",
            Some(serde_json::json!({
                "hospital_id": app.hospital.id,
                "appointment_date": chrono::Utc::now() + chrono::Duration::days(1),
                "appointment_time": "10:30",
            })),
            Some(&donor),
        )
        .await;
    assert_eq!(booked.status, StatusCode::OK, "{:?}", booked.body);
    let appointment_id = booked.body["data"]["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let upcoming = app
        .request("GET", "/api/staff/appointments/upcoming", None, Some(&staff))
        .await;
    assert_eq!(upcoming.body["data"].as_array().map(Vec::len), Some(1));

    let wrong_status = app
        .request(
            "POST",
            &format!("/api/staff/appointments/{appointment_id}/verify"),
            Some(serde_json::json!({ "status": "cancelled" })),
            Some(&staff),
        )
        .await;
    assert_eq!(wrong_status.status, StatusCode::BAD_REQUEST);

    let verified = app
        .request(
            "POST",
            &format!("/api/staff/appointments/{appointment_id}/verify"),
            Some(serde_json::json!({ "status": "donated", "notes": "Smooth draw" })),
            Some(&staff),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK, "{:?}", verified.body);
    assert_eq!(verified.body["data"]["data"]["appointment"]["status"], "donated");
    assert_eq!(verified.body["data"]["data"]["inventory"]["units_available"], 1);

    let latest = app
        .request("GET", "/api/donations/mine/latest", None, Some(&donor))
        .await;
    assert_eq!(latest.body["data"]["blood_group"], "B-");
}

#[tokio::test]
async fn test_recipient_cancels_request() {
    let app = TestApp::new().await;
    let (_, recipient) = app.recipient("asha@example.com").await;
    let (_, other) = app.recipient("someone@example.com").await;

    let request_id = app.create_request(&recipient).await;
    let path = format!("/api/requests/{request_id}/cancel");

    let denied = app.request("POST", &path, None, Some(&other)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let cancelled = app.request("POST", &path, None, Some(&recipient)).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["data"]["status"], "cancelled");

    let pending = app
        .request("GET", "/api/requests/pending", None, Some(&recipient))
        .await;
    assert_eq!(pending.body["data"].as_array().map(Vec::len), Some(0));
}
