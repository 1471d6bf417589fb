use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use coffeeshop_auth::{AuthError, Claims, TokenVerifier};

use crate::metrics::track_authorization_check;
use crate::state::AppState;

/// Verified identity of the caller. Only exists for the lifetime of one
/// request; the gate inserts it into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.has_permission(permission)
    }

    pub fn subject(&self) -> &str {
        &self.0.sub
    }
}

/// Reads the [`AuthUser`] a permission gate left in the request extensions.
/// On a route without a gate there is no identity, which is reported the same
/// way as a request without credentials.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingCredential)
    }
}

pub async fn bearer_token(parts: &mut Parts) -> Result<String, AuthError> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, &())
        .await
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .map_err(|rejection| {
            if rejection.is_missing() {
                AuthError::MissingCredential
            } else {
                AuthError::MalformedCredential(
                    "Authorization header must be a bearer token.".to_string(),
                )
            }
        })
}

/// Verifies the request's bearer token and checks it grants `permission`.
pub async fn authorize(
    verifier: &TokenVerifier,
    parts: &mut Parts,
    permission: &str,
) -> Result<AuthUser, AuthError> {
    let token = bearer_token(parts).await?;
    let claims = verifier.verify(&token).await?;

    if !claims.has_permission(permission) {
        return Err(AuthError::InsufficientScope(permission.to_string()));
    }

    Ok(AuthUser(claims))
}

pub type GateFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Builds a middleware that lets a request through to the wrapped handler
/// only when its token grants `permission`.
///
/// Install it with `axum::middleware::from_fn_with_state`. One gate wraps one
/// route; gates are never combined.
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(State<AppState>, Request, Next) -> GateFuture + Clone + Send + Sync + 'static {
    move |State(state): State<AppState>, req: Request, next: Next| -> GateFuture {
        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            match authorize(&state.verifier, &mut parts, permission).await {
                Ok(auth_user) => {
                    track_authorization_check(permission, true);
                    tracing::debug!(subject = %auth_user.subject(), permission, "Permission granted");
                    parts.extensions.insert(auth_user);
                    next.run(Request::from_parts(parts, body)).await
                }
                Err(err) => {
                    track_authorization_check(permission, false);
                    tracing::warn!(permission, code = err.code(), "Permission denied");
                    err.into_response()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http, http::StatusCode, middleware, routing::get};
    use coffeeshop_auth::create_access_token;
    use coffeeshop_config::{AuthConfig, CorsConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret-0123456789abcdef";
    const PERMISSION: &str = "get:drinks-detail";

    async fn gated_app() -> Router {
        let db = coffeeshop_db::init_memory_pool().await.unwrap();
        let state = AppState::new(
            db,
            AuthConfig::with_secret(SECRET),
            CorsConfig::from_lookup(|_| None),
        );

        Router::new()
            .route(
                "/gated",
                get(|auth_user: AuthUser| async move { auth_user.subject().to_string() })
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_permission(PERMISSION),
                    )),
            )
            .with_state(state)
    }

    fn token(permissions: &[&str]) -> String {
        create_access_token(
            "barista-7",
            permissions.iter().map(|p| p.to_string()).collect(),
            &AuthConfig::with_secret(SECRET),
        )
        .unwrap()
    }

    async fn call(authorization: Option<String>) -> (StatusCode, Vec<u8>) {
        let mut request = http::Request::builder().uri("/gated");
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }

        let response = gated_app()
            .await
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (status, body) = call(None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["message"], "Authorization header is expected.");
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_malformed() {
        let (status, body) = call(Some(format!("Token {}", token(&[PERMISSION])))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["success"], false);
        assert_eq!(json(&body)["error"], 401);
    }

    #[tokio::test]
    async fn test_unparseable_token() {
        let (status, body) = call(Some("Bearer abc.def".to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["message"], "Unable to parse authentication token.");
    }

    #[tokio::test]
    async fn test_missing_permission_is_forbidden() {
        let (status, body) = call(Some(format!("Bearer {}", token(&["post:drinks"])))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json(&body)["error"], 403);
        assert_eq!(json(&body)["message"], "Permission not found.");
    }

    #[tokio::test]
    async fn test_granted_permission_reaches_handler() {
        let (status, body) = call(Some(format!("Bearer {}", token(&[PERMISSION])))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"barista-7");
    }

    #[tokio::test]
    async fn test_auth_user_without_gate_is_rejected() {
        let mut parts = http::Request::builder()
            .uri("/")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.unwrap_err(), AuthError::MissingCredential);
    }
}
