//! # Coffee Shop Core
//!
//! Core types shared by every Coffee Shop crate:
//!
//! - [`errors`]: Application error type rendered as the JSON error envelope
//! - [`permissions`]: Permission strings expected in access token claims
//!
//! # Example
//!
//! ```ignore
//! use coffeeshop_core::AppError;
//!
//! let error = AppError::not_found();
//! ```

pub mod errors;
pub mod permissions;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
