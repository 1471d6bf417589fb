//! # Coffee Shop Auth
//!
//! Bearer token verification for the Coffee Shop API.
//!
//! - [`claims`]: Claims carried by an access token
//! - [`error`]: Typed authorization failures with fixed HTTP statuses
//! - [`jwks`]: Key set fetching and caching for RS256 tokens
//! - [`jwt`]: [`TokenVerifier`] and the local development token issuer
//!
//! # Example
//!
//! ```ignore
//! use coffeeshop_auth::{TokenVerifier, create_access_token};
//! use coffeeshop_config::AuthConfig;
//!
//! let config = AuthConfig::with_secret("dev-secret");
//! let token = create_access_token("barista-1", vec!["get:drinks-detail".into()], &config)?;
//!
//! let verifier = TokenVerifier::new(config);
//! let claims = verifier.verify(&token).await?;
//! assert!(claims.has_permission("get:drinks-detail"));
//! ```

pub mod claims;
pub mod error;
pub mod jwks;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Audience, Claims};
pub use error::AuthError;
pub use jwt::{TokenVerifier, create_access_token};
