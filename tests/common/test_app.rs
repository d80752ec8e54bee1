//! Test application setup utilities
//!
//! Builds the full `/api/v1` router over a throwaway SQLite file, with the
//! notification port either recorded in memory or pointed at a mock endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointly::{
    api,
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db,
    middleware::auth::create_access_token,
    services::{HttpNotificationDispatcher, NotificationDispatcher},
    AppState,
};

use super::fixtures::{bodies, ids, TEST_SECRET};
use super::mocks::RecordingDispatcher;

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Notifications sent by the app, unless built with a notification URL
    pub notifications: Arc<RecordingDispatcher>,
}

/// Identifiers produced by [`TestApp::seed_business`]
#[derive(Debug, Clone)]
pub struct SeededBusiness {
    pub business_id: String,
    pub service_id: String,
    pub member_id: String,
    pub owner_token: String,
}

impl TestApp {
    /// Create a new test application with a recording notification port
    pub async fn new() -> Self {
        let notifications = RecordingDispatcher::new();
        Self::with_dispatcher(notifications.clone(), notifications).await
    }

    /// Create a test application that POSTs notifications to `url`
    pub async fn with_notification_url(url: &str) -> Self {
        let http = HttpNotificationDispatcher::new(url, Duration::from_secs(5))
            .expect("Failed to build notification client");
        Self::with_dispatcher(Arc::new(http), RecordingDispatcher::new()).await
    }

    async fn with_dispatcher(
        notifier: Arc<dyn NotificationDispatcher>,
        notifications: Arc<RecordingDispatcher>,
    ) -> Self {
        let config = test_config();
        let db = db::init_pool(&config.database)
            .await
            .expect("Failed to initialize test database");

        let state = AppState::new(config, db, notifier);
        let router = api::create_router(state.clone());

        Self {
            router,
            state,
            notifications,
        }
    }

    /// Token for `user_id` signed with the test secret
    pub fn token(&self, user_id: &str, roles: &[&str]) -> String {
        create_access_token(
            user_id,
            &format!("{}@example.com", user_id),
            roles.iter().map(|r| r.to_string()).collect(),
            &self.state.config.auth.jwt_secret,
            1,
        )
        .expect("Failed to generate test token")
    }

    pub fn owner_token(&self) -> String {
        self.token(ids::OWNER_ID, &["admin"])
    }

    /// Owner with a business, a 60 minute service and one team member who is
    /// available on Mondays. Everything goes through the HTTP surface.
    pub async fn seed_business(&self) -> SeededBusiness {
        let owner_token = self.owner_token();
        let member_token = self.token(ids::MEMBER_ID, &["team"]);

        self.put_json_auth(
            "/api/v1/profile",
            bodies::profile("Ana Owner", json!({})),
            &owner_token,
        )
        .await
        .assert_ok();
        self.put_json_auth(
            "/api/v1/profile",
            bodies::profile("Maria Lopez", json!({"Monday": "Available"})),
            &member_token,
        )
        .await
        .assert_ok();

        let business: Value = self
            .post_json_auth(
                "/api/v1/admin/business",
                bodies::business("Glow Studio"),
                &owner_token,
            )
            .await
            .assert_created()
            .json();

        let service: Value = self
            .post_json_auth(
                "/api/v1/admin/services",
                bodies::service("Haircut", 1, 0),
                &owner_token,
            )
            .await
            .assert_created()
            .json();

        self.put_json_auth(
            &format!("/api/v1/admin/team/{}", ids::MEMBER_ID),
            json!({}),
            &owner_token,
        )
        .await
        .assert_ok();

        SeededBusiness {
            business_id: business["id"].as_str().unwrap().to_string(),
            service_id: service["id"].as_str().unwrap().to_string(),
            member_id: ids::MEMBER_ID.to_string(),
            owner_token,
        }
    }

    /// Make a GET request to the test application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Some(token)).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn post_json_auth(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn put_json_auth(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), Some(token)).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, Some(token)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.request(request).await
    }

    /// Make an arbitrary request
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: bytes::Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse response as JSON")
    }

    /// Assert the response status
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_created(&self) -> &Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_unauthorized(&self) -> &Self {
        self.assert_status(StatusCode::UNAUTHORIZED)
    }

    pub fn assert_forbidden(&self) -> &Self {
        self.assert_status(StatusCode::FORBIDDEN)
    }

    pub fn assert_not_found(&self) -> &Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_unprocessable(&self) -> &Self {
        self.assert_status(StatusCode::UNPROCESSABLE_ENTITY)
    }
}

/// Test configuration with a temporary SQLite file
pub fn test_config() -> AppConfig {
    // Unique file per test so parallel tests never share state
    let db_path = std::env::temp_dir().join(format!("appointly_test_{}.db", Uuid::new_v4().simple()));

    AppConfig {
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
        },
        database: DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        },
        ..AppConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = TestApp::new().await;
        let response = app.get("/api/v1/health").await;
        response.assert_ok();
        let json: Value = response.json();
        assert_eq!(json["status"], "healthy");
    }
}
