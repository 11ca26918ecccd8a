//! Middleware Module
//!
//! Request processing shared across routes.
//!
//! - **`auth`** - Admin session extractor for protected routes

/// Admin session extractor
pub mod auth;

pub use auth::AdminToken;
