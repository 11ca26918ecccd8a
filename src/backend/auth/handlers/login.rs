/**
 * Admin Login Handler
 *
 * `POST /api/admin/login` with `{ "password": ... }`.
 *
 * # Process
 *
 * 1. Reject an empty password (400)
 * 2. Refuse when no admin password is configured (503)
 * 3. Compare against the configured password (401 on mismatch)
 * 4. Issue a session token
 */

use axum::{extract::State, response::Json};
use crate::backend::auth::handlers::types::LoginRequest;
use crate::backend::auth::sessions::AdminSession;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Example Response
///
/// ```json
/// {
///   "sessionToken": "admin_3f2c...",
///   "expiresAt": "2025-03-01T20:00:00Z"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminSession>, BackendError> {
    if request.password.is_empty() {
        return Err(BackendError::bad_request("Password is required"));
    }

    let expected = state.admin_password.as_deref().ok_or_else(|| {
        tracing::error!("ADMIN_PASSWORD not set. Admin login unavailable.");
        BackendError::state("Admin login is not configured")
    })?;

    if !passwords_match(&request.password, expected) {
        tracing::warn!("Admin login failed - invalid credentials");
        return Err(BackendError::unauthorized("Invalid credentials"));
    }

    let session = state.sessions.create().await;
    tracing::info!("Admin login successful");
    Ok(Json(session))
}

/// Compare without bailing out at the first differing byte
fn passwords_match(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
