//! Authentication Module
//!
//! Admin sessions for the review screens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - SessionStore (opaque tokens with expiry)
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── login.rs    - POST /api/admin/login
//!     └── logout.rs   - POST /api/admin/logout
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: password checked against `ADMIN_PASSWORD` → session token returned
//! 2. **Protected routes**: `Authorization: Bearer <token>` checked by
//!    [`AdminToken`](crate::backend::middleware::auth::AdminToken)
//! 3. **Logout**: token revoked
//!
//! Sessions expire after `ADMIN_SESSION_TTL_SECS` (8 hours by default).

/// Admin session registry
pub mod sessions;

/// HTTP handlers for admin auth
pub mod handlers;

pub use handlers::{login, logout};
pub use sessions::{AdminSession, SessionStore};
