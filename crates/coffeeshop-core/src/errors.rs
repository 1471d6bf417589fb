//! Application error type and the JSON error envelope.
//!
//! Every non-2xx response leaves the API in the same shape:
//!
//! ```json
//! { "success": false, "error": 404, "message": "resource not found" }
//! ```
//!
//! Server faults (5xx) never expose their source; the source is logged and the
//! client only sees `internal server error`.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

pub const NOT_FOUND_MESSAGE: &str = "resource not found";
pub const UNPROCESSABLE_MESSAGE: &str = "unprocessable";
pub const CONFLICT_MESSAGE: &str = "drink title already exists";
pub const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// HTTP status code, repeated in the body
    pub error: u16,
    pub message: String,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, anyhow!(NOT_FOUND_MESSAGE))
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    /// A unique field collided with an existing row.
    pub fn conflict() -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, anyhow!(CONFLICT_MESSAGE))
    }

    /// Unexpected store fault. The cause is logged here and replaced with a
    /// generic message so driver internals never reach the client.
    pub fn persistence<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        let err = err.into();
        tracing::error!(error = %err, "persistence failure");
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, anyhow!(UNPROCESSABLE_MESSAGE))
    }

    pub fn message(&self) -> String {
        if self.status.is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = %self.error, "server error");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.status.as_u16(),
            message: self.message(),
        });

        (self.status, body).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        AppError::unprocessable(anyhow!(message))
    }
}
