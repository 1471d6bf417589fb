//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: Bearer token extraction and the permission gate
//!
//! # Authorization Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. The gate installed on the route verifies the token and extracts claims
//! 3. The gate checks the claims contain the route's required permission
//! 4. The handler runs with the verified [`auth::AuthUser`] in request extensions
//!
//! # Example
//!
//! ```ignore
//! use axum::{middleware, routing::post};
//! use crate::middleware::auth::require_permission;
//!
//! let route = post(create_drink).route_layer(middleware::from_fn_with_state(
//!     state.clone(),
//!     require_permission(permissions::DRINKS_CREATE),
//! ));
//! ```

pub mod auth;
