//! # Coffee Shop API
//!
//! A REST API built with Rust, Axum, and SQLite that serves a coffee shop's
//! drinks menu. Anyone may read the public menu; baristas and managers use
//! bearer tokens whose `permissions` claim decides what else they can do.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Administrative commands (reset-db, issue-token, migrate)
//! ├── middleware/       # Permission gate and the verified-identity extractor
//! ├── modules/
//! │   └── drinks/      # controller, repository, router
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Subscriber setup and request logging
//! ├── metrics.rs        # Prometheus recorder and counters
//! ├── router.rs         # Main application router
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Workspace crates hold everything that is not HTTP glue:
//!
//! - `coffeeshop-core`: `AppError` and the JSON error envelope, permission names
//! - `coffeeshop-config`: environment-backed configuration
//! - `coffeeshop-db`: SQLite pool and embedded migrations
//! - `coffeeshop-auth`: claims, `TokenVerifier`, development token issuer
//! - `coffeeshop-models`: drinks, recipes and their short/long views
//!
//! ## Endpoints
//!
//! | Method | Path | Permission |
//! |--------|------|------------|
//! | GET | `/drinks` | none |
//! | GET | `/drinks-detail` | `get:drinks-detail` |
//! | POST | `/drinks` | `post:drinks` |
//! | PATCH | `/drinks/{id}` | `patch:drinks` |
//! | DELETE | `/drinks/{id}` | `delete:drinks` |
//!
//! Every error response has the shape
//! `{"success": false, "error": <status>, "message": "..."}`.
//!
//! ## Quick Start
//!
//! ```bash
//! DATABASE_URL=sqlite://database.db?mode=rwc
//! JWT_SECRET=your-secure-secret-key
//! RESET_DB_ON_STARTUP=true
//! ```
//!
//! ```bash
//! cargo run --bin coffeeshop-cli -- issue-token --subject manager
//! cargo run
//! ```
//!
//! Set `AUTH0_DOMAIN` (and usually `API_AUDIENCE`) to verify RS256 tokens
//! against the identity provider's published key set instead.

pub mod cli;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use coffeeshop_auth;
pub use coffeeshop_config;
pub use coffeeshop_core;
pub use coffeeshop_db;
pub use coffeeshop_models;
