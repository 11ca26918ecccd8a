/**
 * Admin Auth Handler Types
 *
 * Request and response bodies for the admin login and logout handlers.
 */

use serde::{Deserialize, Serialize};

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    /// Checked against `ADMIN_PASSWORD`
    #[serde(default)]
    pub password: String,
}

/// Logout response
#[derive(Serialize, Deserialize, Debug)]
pub struct LogoutResponse {
    pub success: bool,
}
