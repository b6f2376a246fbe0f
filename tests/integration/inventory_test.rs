//! Integration tests for stock views and supervisor adjustments.

use axum::http::StatusCode;

use lifeshare_entity::user::StaffRole;

use crate::helpers::TestApp;

async fn adjust(app: &TestApp, token: &str, adjustment: i32) -> crate::helpers::TestResponse {
    app.request(
        "POST",
        "/api/staff/stock/adjust",
        Some(serde_json::json!({
            "blood_group": "A+",
            "adjustment": adjustment,
            "reason": "Stock count",
        })),
        Some(token),
    )
    .await
}

#[tokio::test]
async fn test_supervisor_adjusts_stock() {
    let app = TestApp::new().await;
    let (_, supervisor) = app.staff("lead@citygeneral.org", StaffRole::Supervisor).await;

    let added = adjust(&app, &supervisor, 12).await;
    assert_eq!(added.status, StatusCode::OK, "{:?}", added.body);
    assert_eq!(added.body["data"]["message"], "Stock adjusted successfully");
    assert_eq!(added.body["data"]["data"]["units_available"], 12);
    assert_eq!(added.body["data"]["data"]["level"], "available");

    let removed = adjust(&app, &supervisor, -9).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["data"]["data"]["units_available"], 3);

    let low = app
        .request("GET", "/api/staff/stock?low=true", None, Some(&supervisor))
        .await;
    assert_eq!(low.status, StatusCode::OK);
    assert_eq!(low.body["data"][0]["blood_group"], "A+");
    assert_eq!(low.body["data"][0]["level"], "low");
}

#[tokio::test]
async fn test_stock_never_goes_negative() {
    let app = TestApp::new().await;
    let (_, supervisor) = app.staff("lead@citygeneral.org", StaffRole::Supervisor).await;

    let missing = adjust(&app, &supervisor, -1).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    adjust(&app, &supervisor, 2).await;
    let overdrawn = adjust(&app, &supervisor, -3).await;
    assert_eq!(overdrawn.status, StatusCode::BAD_REQUEST);

    let stock = app
        .request("GET", "/api/staff/stock", None, Some(&supervisor))
        .await;
    assert_eq!(stock.body["data"][0]["units_available"], 2);
}

#[tokio::test]
async fn test_only_supervisors_adjust() {
    let app = TestApp::new().await;
    let (_, nurse) = app.staff("nurse@citygeneral.org", StaffRole::Nurse).await;

    let response = adjust(&app, &nurse, 5).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Only supervisors can adjust inventory");
}

#[tokio::test]
async fn test_unknown_kind_rejected() {
    let app = TestApp::new().await;
    let (_, staff) = app.staff("nurse@citygeneral.org", StaffRole::Nurse).await;

    let response = app
        .request("GET", "/api/hospital/stock?kind=serum", None, Some(&staff))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
