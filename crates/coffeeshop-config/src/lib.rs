//! # Coffee Shop Config
//!
//! Configuration types for the Coffee Shop API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`auth`]: Token verification (key source, issuer, audience)
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address and startup behavior
//!
//! Every type has a `from_env()` constructor backed by a `from_lookup()`
//! constructor that takes an arbitrary variable source, so tests never touch
//! the process environment.
//!
//! # Example
//!
//! ```ignore
//! use coffeeshop_config::{AuthConfig, CorsConfig, ServerConfig};
//!
//! let auth_config = AuthConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod auth;
pub mod cors;
pub mod server;

// Re-export commonly used types at crate root
pub use auth::{AuthConfig, KeySource};
pub use cors::CorsConfig;
pub use server::ServerConfig;

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
