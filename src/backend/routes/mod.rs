//! Route Configuration Module
//!
//! Configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and health check
//! └── api_routes.rs   - Inspection and admin endpoints
//! ```
//!
//! # Route Types
//!
//! - `GET|HEAD /health` - Liveness
//! - `GET /api/inspections/pending` - Pending review list
//! - `POST /api/inspections` - Submit a form
//! - `POST /api/inspections/{id}/review` - Mark reviewed (admin)
//! - `POST /api/admin/login`, `POST /api/admin/logout`
//! - `GET /api/admin/inspections` - All submissions (admin)

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
