use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use coffeeshop::router::init_router;
use coffeeshop::state::AppState;
use coffeeshop_auth::create_access_token;
use coffeeshop_config::{AuthConfig, CorsConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig::with_secret(TEST_SECRET)
}

/// Router over a private in-memory database with migrations applied.
pub async fn setup_test_app() -> Router {
    let db = coffeeshop_db::init_memory_pool().await.unwrap();
    let state = AppState::new(db, test_auth_config(), CorsConfig::from_lookup(|_| None));
    init_router(state)
}

pub fn token_with(permissions: &[&str]) -> String {
    create_access_token(
        "test-user",
        permissions.iter().map(|p| p.to_string()).collect(),
        &test_auth_config(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_title() -> String {
    format!("Drink {}", Uuid::new_v4())
}

/// Sends one request through a clone of `app` and returns the status and the
/// body parsed as JSON (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
