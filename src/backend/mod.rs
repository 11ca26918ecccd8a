//! Backend Module
//!
//! Server-side code for the inspection API: the endpoints the offline-aware
//! client polls and submits to.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`inspections`** - Submission storage and handlers
//! - **`auth`** - Admin sessions and login/logout
//! - **`middleware`** - Admin session extractor
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── inspections/    - Inspection store and handlers
//! ├── auth/           - Admin sessions
//! ├── middleware/     - Request extractors
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the inspection store behind `Arc<RwLock<>>`, the admin
//! session registry and the injected clock. Everything is in memory; a
//! restart starts empty.

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Inspection storage and handlers
pub mod inspections;

/// Admin authentication
pub mod auth;

/// Request middleware
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, create_app_with_state, AppState, ServerConfig};
