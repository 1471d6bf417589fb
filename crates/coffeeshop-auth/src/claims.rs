//! Claims carried by an access token.
//!
//! Only `sub`, `permissions` and the time claims are read by the API.
//! `iss` and `aud` are checked by the verifier against configuration and kept
//! here so locally issued tokens can carry them too.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `aud` may be a single string or a list, depending on the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Verified access token claims. Valid for the lifetime of one request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject (user identity at the issuer)
    pub sub: String,
    /// Granted permission strings, e.g. `post:drinks`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Issued-at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }

    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or_default()
    }
}
