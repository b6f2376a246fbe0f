//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use lifeshare_api::{AppState, build_app};
use lifeshare_auth::Claims;
use lifeshare_core::config::AppConfig;
use lifeshare_core::traits::Mailer;
use lifeshare_database::Repositories;
use lifeshare_entity::BloodGroup;
use lifeshare_entity::hospital::{CreateHospital, Hospital};
use lifeshare_entity::user::{CreateUser, StaffRole, User, UserRole};
use lifeshare_mail::MailerManager;
use lifeshare_service::Services;
use lifeshare_worker::jobs::default_executor;

pub const JWT_SECRET: &str = "integration-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Stores for seeding and direct checks
    pub repos: Repositories,
    /// Verified hospital every request is raised at
    pub hospital: Hospital,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.auth.jwt_secret = JWT_SECRET.to_string();
        config.auth.leeway_seconds = 0;
        config.notifications.send_delay_ms = 0;
        config.notifications.notify_donors_on_create = false;
        config.scheduler.enabled = false;

        let repos = Repositories::from_config(&config.database)
            .await
            .expect("Failed to build store");
        let mailer: Arc<dyn Mailer> =
            Arc::new(MailerManager::new(&config.mail).expect("Failed to build mailer"));
        let services = Services::new(&repos, mailer, &config);
        let executor = Arc::new(default_executor(&services));

        let mut hospital = CreateHospital::verified("City General", "desk@citygeneral.org");
        hospital.city = Some("Pune".to_string());
        let hospital = repos
            .hospitals
            .create(&hospital)
            .await
            .expect("Failed to seed hospital");

        let router = build_app(AppState::new(config, repos.clone(), services, executor));

        Self {
            router,
            repos,
            hospital,
        }
    }

    /// Mint a token for a stored user
    pub fn token_for(&self, user: &User) -> String {
        mint(user, JWT_SECRET, Duration::hours(1))
    }

    async fn seed(&self, input: CreateUser) -> (User, String) {
        let user = self
            .repos
            .users
            .create(&input)
            .await
            .expect("Failed to seed user");
        let token = self.token_for(&user);
        (user, token)
    }

    pub async fn donor(&self, email: &str, group: BloodGroup) -> (User, String) {
        let mut input = CreateUser::new(UserRole::Donor, email, email);
        input.blood_group = Some(group);
        self.seed(input).await
    }

    pub async fn recipient(&self, email: &str) -> (User, String) {
        self.seed(CreateUser::new(UserRole::Recipient, email, email))
            .await
    }

    pub async fn staff(&self, email: &str, role: StaffRole) -> (User, String) {
        let mut input = CreateUser::new(UserRole::HospitalStaff, email, email);
        input.hospital_id = Some(self.hospital.id);
        input.staff_role = Some(role);
        self.seed(input).await
    }

    pub async fn admin(&self) -> (User, String) {
        self.seed(CreateUser::new(UserRole::Admin, "Ops", "ops@lifeshare.org"))
            .await
    }

    /// Raise an O- request as the given recipient and return its id
    pub async fn create_request(&self, recipient_token: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/requests",
                Some(serde_json::json!({
                    "blood_group": "O-",
                    "units_needed": 2,
                    "urgency": "high",
                    "hospital_id": self.hospital.id,
                    "patient_name": "Meera",
                })),
                Some(recipient_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]["data"]["id"]
            .as_str()
            .expect("request id")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Sign claims for `user` the way the identity provider would
pub fn mint(user: &User, secret: &str, valid_for: Duration) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        role: user.role,
        hospital_id: user.hospital_id,
        staff_role: user.staff_role,
        iat: now.timestamp(),
        exp: (now + valid_for).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of a failure envelope
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
