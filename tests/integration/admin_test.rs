//! Integration tests for administrator endpoints.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use lifeshare_entity::BloodGroup;
use lifeshare_entity::user::{CreateUser, StaffRole, UserRole};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_plasma_admin_lifecycle() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let registered = app
        .request(
            "POST",
            "/api/admin/plasma",
            Some(serde_json::json!({
                "hospital_id": app.hospital.id,
                "blood_group": "AB+",
                "units": 3,
                "expiry_date": Utc::now() + Duration::days(30),
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);
    assert_eq!(registered.body["data"]["data"]["kind"], "plasma");
    let id = registered.body["data"]["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let negative = app
        .request(
            "PUT",
            &format!("/api/admin/plasma/{id}"),
            Some(serde_json::json!({ "units_available": -1 })),
            Some(&admin),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let corrected = app
        .request(
            "PUT",
            &format!("/api/admin/plasma/{id}"),
            Some(serde_json::json!({ "units_available": 7 })),
            Some(&admin),
        )
        .await;
    assert_eq!(corrected.status, StatusCode::OK);
    assert_eq!(corrected.body["data"]["data"]["units_available"], 7);

    let listing = app
        .request("GET", "/api/admin/inventory?kind=plasma", None, Some(&admin))
        .await;
    assert_eq!(listing.body["data"].as_array().map(Vec::len), Some(1));

    let deleted = app
        .request("DELETE", &format!("/api/admin/plasma/{id}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let again = app
        .request("DELETE", &format!("/api/admin/plasma/{id}"), None, Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_triggers_require_admin() {
    let app = TestApp::new().await;
    let (_, supervisor) = app.staff("lead@citygeneral.org", StaffRole::Supervisor).await;

    let response = app
        .request("POST", "/api/admin/triggers/reminders", None, Some(&supervisor))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reminder_trigger_reports_sweep() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let mut lapsed = CreateUser::new(UserRole::Donor, "Ravi", "ravi@example.com");
    lapsed.blood_group = Some(BloodGroup::APositive);
    lapsed.last_donation_date = Some(Utc::now() - Duration::days(120));
    app.repos.users.create(&lapsed).await.unwrap();
    app.donor("recent@example.com", BloodGroup::APositive).await;

    let response = app
        .request("POST", "/api/admin/triggers/reminders", None, Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["total_eligible"], 1);
    assert_eq!(response.body["data"]["sent"], 1);
}

#[tokio::test]
async fn test_expiry_trigger_by_kind() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let one = app
        .request("POST", "/api/admin/triggers/expiry?kind=plasma", None, Some(&admin))
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["data"]["kind"], "plasma");

    let both = app
        .request("POST", "/api/admin/triggers/expiry", None, Some(&admin))
        .await;
    assert_eq!(both.body["data"].as_array().map(Vec::len), Some(2));

    let bad = app
        .request("POST", "/api/admin/triggers/expiry?kind=serum", None, Some(&admin))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_read_models() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
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
    let response_id = responded.body["data"]["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    app.request(
        "PATCH",
        &format!("/api/responses/{response_id}"),
        Some(serde_json::json!({ "status": "accepted" })),
        Some(&recipient),
    )
    .await;

    let from_responses = app
        .request("GET", "/api/admin/matches/responses", None, Some(&admin))
        .await;
    assert_eq!(
        from_responses.body["data"][0]["request"]["id"],
        request_id.as_str()
    );

    let from_requests = app
        .request("GET", "/api/admin/matches/requests", None, Some(&admin))
        .await;
    assert_eq!(from_requests.body["data"].as_array().map(Vec::len), Some(1));

    let completed = app
        .request("GET", "/api/admin/matches/completed", None, Some(&admin))
        .await;
    assert_eq!(completed.body["data"].as_array().map(Vec::len), Some(0));

    let denied = app
        .request("GET", "/api/admin/matches/completed", None, Some(&recipient))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_hospital_directory_endpoints() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let (_, donor) = app.donor("dora@example.com", BloodGroup::APositive).await;

    let created = app
        .request(
            "POST",
            "/api/admin/hospitals",
            Some(serde_json::json!({
                "name": "Riverside Hospital",
                "email": "info@riverside.org",
                "city": "Nashik",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(created.body["data"]["data"]["verified"], false);
    let id = created.body["data"]["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let invalid = app
        .request(
            "POST",
            "/api/admin/hospitals",
            Some(serde_json::json!({ "name": "Nameless", "email": "nope" })),
            Some(&admin),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let denied = app
        .request(
            "PATCH",
            &format!("/api/admin/hospitals/{id}/verify"),
            Some(serde_json::json!({ "verified": true })),
            Some(&donor),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let verified = app
        .request(
            "PATCH",
            &format!("/api/admin/hospitals/{id}/verify"),
            Some(serde_json::json!({ "verified": true })),
            Some(&admin),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK, "{:?}", verified.body);
    assert_eq!(verified.body["data"]["data"]["verified"], true);

    let listing = app
        .request("GET", "/api/hospitals/verified", None, Some(&donor))
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    let names: Vec<&str> = listing.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|h| h["name"].as_str())
        .collect();
    assert_eq!(names, vec!["City General", "Riverside Hospital"]);

    let removed = app
        .request("DELETE", &format!("/api/admin/hospitals/{id}"), None, Some(&admin))
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let (_, recipient) = app.recipient("rita@example.com").await;
    app.create_request(&recipient).await;
    let in_use = app
        .request(
            "DELETE",
            &format!("/api/admin/hospitals/{}", app.hospital.id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(in_use.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_stats_endpoint() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let (_, recipient) = app.recipient("rita@example.com").await;
    app.create_request(&recipient).await;

    let stats = app
        .request("GET", "/api/admin/stats", None, Some(&admin))
        .await;
    assert_eq!(stats.status, StatusCode::OK, "{:?}", stats.body);
    assert_eq!(stats.body["data"]["total_users"], 2);
    assert_eq!(stats.body["data"]["total_recipients"], 1);
    assert_eq!(stats.body["data"]["pending_requests"], 1);
    assert_eq!(stats.body["data"]["total_donations"], 0);
    assert_eq!(stats.body["data"]["plasma_stock_alerts"], 0);

    let denied = app
        .request("GET", "/api/admin/stats", None, Some(&recipient))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}
