//! Shared helpers for API integration tests.
//!
//! Builds the application router exactly as production does (same middleware
//! stack via `router::build_app_router`), with the optional external
//! services (LLM, storage, SMTP) left unconfigured.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use atelier_api::auth::jwt::{generate_access_token, JwtConfig};
use atelier_api::auth::password::hash_password;
use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_core::types::DbId;
use atelier_db::models::user::{CreateUser, UserRole};
use atelier_db::repositories::UserRepo;
use atelier_events::EventBus;

/// Password used for every seeded test user.
pub const TEST_PASSWORD: &str = "correct-horse-battery-staple";

/// Shared secret wired into the test config for `/cron` endpoints.
pub const TEST_CRON_SECRET: &str = "test-cron-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        cron_secret: TEST_CRON_SECRET.to_string(),
        studio_timezone: chrono_tz::UTC,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        assistant: None,
        storage: None,
        mailer: None,
    };
    build_app_router(state, &config)
}

/// Insert a user with [`TEST_PASSWORD`] and return `(id, bearer_token)`.
pub async fn seed_user(pool: &PgPool, email: &str, role: UserRole) -> (DbId, String) {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing must succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            display_name: "Test User".to_string(),
            role,
        },
    )
    .await
    .expect("user insert must succeed");

    let token = generate_access_token(user.id, role.as_str(), &test_config().jwt)
        .expect("token generation must succeed");
    (user.id, token)
}

/// Convenience: seed an admin and return their bearer token.
pub async fn seed_admin(pool: &PgPool) -> String {
    seed_user(pool, "admin@example.com", UserRole::Admin).await.1
}

/// Convenience: seed a staff user and return their bearer token.
pub async fn seed_staff(pool: &PgPool) -> String {
    seed_user(pool, "staff@example.com", UserRole::Staff).await.1
}

/// Issue a request against the app. `token` adds a Bearer header; `body`
/// is sent as JSON.
pub async fn request(
    app: Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// GET without auth.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    request(app, "GET", path, None, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("body must be valid JSON")
}

/// Assert a status and return the parsed JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status, "unexpected status");
    body_json(response).await
}
