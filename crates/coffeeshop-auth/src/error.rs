use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coffeeshop_core::AppError;

/// Authorization failures. Each kind has a fixed status and a human readable
/// description that is sent to the client unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingCredential,

    #[error("{0}")]
    MalformedCredential(String),

    #[error("{0}")]
    UnverifiableSignature(String),

    #[error("Token expired.")]
    Expired,

    #[error("{0}")]
    InvalidClaims(String),

    /// Carries the permission that was required.
    #[error("Permission not found.")]
    InsufficientScope(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "authorization_header_missing",
            AuthError::MalformedCredential(_) => "invalid_header",
            AuthError::UnverifiableSignature(_) => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::InsufficientScope(_) => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::new(err.status(), err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.code(), "authorization rejected");
        AppError::from(self).into_response()
    }
}
