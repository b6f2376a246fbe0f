//! Integration tests for token verification and the error envelope.

use axum::http::StatusCode;
use chrono::Duration;

use lifeshare_entity::BloodGroup;

use crate::helpers::{TestApp, mint};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/requests/mine", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error_code(), "AUTHENTICATION");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new().await;
    let (donor, _) = app.donor("ravi@example.com", BloodGroup::OPositive).await;
    let forged = mint(&donor, "someone-else", Duration::hours(1));

    let response = app
        .request("GET", "/api/requests/feed", None, Some(&forged))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let (donor, _) = app.donor("ravi@example.com", BloodGroup::OPositive).await;
    let expired = mint(&donor, crate::helpers::JWT_SECRET, Duration::minutes(-5));

    let response = app
        .request("GET", "/api/requests/feed", None, Some(&expired))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token has expired");
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let app = TestApp::new().await;
    let (_, donor_token) = app.donor("ravi@example.com", BloodGroup::ONegative).await;

    let response = app
        .request(
            "POST",
            "/api/requests",
            Some(serde_json::json!({
                "blood_group": "O-",
                "hospital_id": app.hospital.id,
            })),
            Some(&donor_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "AUTHORIZATION");
}

#[tokio::test]
async fn test_malformed_path_id_is_bad_request() {
    let app = TestApp::new().await;
    let (_, token) = app.recipient("asha@example.com").await;

    let response = app
        .request("GET", "/api/requests/not-a-uuid", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}
