/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server:
 * state creation, the session cleanup task and route configuration.
 */

use axum::Router;
use std::time::Duration;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// How often expired admin sessions are purged
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Create and configure the Axum application from environment configuration
///
/// A malformed environment value is logged and defaults are used instead, so
/// a typo never keeps the server from starting.
#[cfg(feature = "ssr")]
pub async fn create_app() -> Router<()> {
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("Invalid server configuration, using defaults: {}", e);
        ServerConfig::default()
    });
    create_app_with_state(AppState::new(&config))
}

/// Create the application around existing state
///
/// Starts the periodic session purge and builds the router.
#[cfg(feature = "ssr")]
pub fn create_app_with_state(app_state: AppState) -> Router<()> {
    tracing::info!("Initializing inspection server");

    let sessions = app_state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                tracing::debug!("Purged {} expired admin sessions", purged);
            }
        }
    });

    let app = create_router(app_state);
    tracing::info!("Router configured with session cleanup task");
    app
}
