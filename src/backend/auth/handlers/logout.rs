/**
 * Admin Logout Handler
 *
 * `POST /api/admin/logout` ends the session named by the bearer token.
 */

use axum::{extract::State, response::Json};
use crate::backend::auth::handlers::types::LogoutResponse;
use crate::backend::auth::sessions::SessionStore;
use crate::backend::middleware::auth::AdminToken;

pub async fn logout(
    AdminToken(token): AdminToken,
    State(sessions): State<SessionStore>,
) -> Json<LogoutResponse> {
    let success = sessions.revoke(&token).await;
    tracing::info!("Admin logout");
    Json(LogoutResponse { success })
}
