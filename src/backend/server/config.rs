/**
 * Server Configuration
 *
 * This module loads server configuration from environment variables, with
 * defaults suitable for local development.
 *
 * # Variables
 *
 * - `SERVER_PORT` - listen port (default 3000)
 * - `ADMIN_PASSWORD` - password for `POST /api/admin/login`. When unset,
 *   admin login is disabled and answers 503.
 * - `ADMIN_SESSION_TTL_SECS` - admin session lifetime (default 8 hours)
 */

use crate::shared::config::ConfigError;
use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;
/// Default admin session lifetime
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_password: Option<String>,
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            admin_password: None,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// Unset variables fall back to defaults. Set but unparseable values are
    /// an error rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                message: format!("'{}' is not a valid port", port),
            })?;
        }

        config.admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|password| !password.is_empty());
        if config.admin_password.is_none() {
            tracing::warn!("ADMIN_PASSWORD not set. Admin login will be disabled.");
        }

        if let Ok(ttl) = std::env::var("ADMIN_SESSION_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "ADMIN_SESSION_TTL_SECS",
                message: format!("'{}' is not a number of seconds", ttl),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "ADMIN_SESSION_TTL_SECS",
                    message: "must be greater than zero".to_string(),
                });
            }
            config.session_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = Some(password.into());
        self
    }
}
