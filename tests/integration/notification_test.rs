//! Integration tests for the notification inbox.

use axum::http::StatusCode;

use lifeshare_entity::user::StaffRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_inbox_read_and_delete() {
    let app = TestApp::new().await;
    let (_, supervisor) = app.staff("lead@citygeneral.org", StaffRole::Supervisor).await;
    let (_, other) = app.staff("nurse@citygeneral.org", StaffRole::Nurse).await;

    app.request(
        "POST",
        "/api/staff/stock/adjust",
        Some(serde_json::json!({ "blood_group": "O+", "adjustment": 4 })),
        Some(&supervisor),
    )
    .await;

    let inbox = app
        .request("GET", "/api/notifications?page=1&per_page=10", None, Some(&supervisor))
        .await;
    assert_eq!(inbox.status, StatusCode::OK);
    let first = &inbox.body["data"]["items"][0];
    assert_eq!(first["kind"], "stock_adjusted");
    assert_eq!(first["message"], "O+ inventory increased by 4 units.");
    let id = first["id"].as_str().unwrap().to_string();

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&supervisor))
        .await;
    assert_eq!(unread.body["data"]["count"], 1);

    let foreign = app
        .request("PATCH", &format!("/api/notifications/{id}/read"), None, Some(&other))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let read = app
        .request("PATCH", &format!("/api/notifications/{id}/read"), None, Some(&supervisor))
        .await;
    assert_eq!(read.status, StatusCode::OK);

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&supervisor))
        .await;
    assert_eq!(unread.body["data"]["count"], 0);

    let deleted = app
        .request("DELETE", &format!("/api/notifications/{id}"), None, Some(&supervisor))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&supervisor))
        .await;
    assert_eq!(inbox.body["data"]["items"].as_array().map(Vec::len), Some(0));
}
