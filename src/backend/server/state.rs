/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - The inspection store behind `Arc<RwLock<>>`
 * - The admin session registry
 * - The admin password, when admin login is enabled
 * - The clock used to timestamp submissions and reviews
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers (and the admin session
 * extractor) to pull out just the part of the state they need.
 *
 * # Example
 *
 * ```rust,ignore
 * use custodial_sync::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let pending = state.inspections.read().await.pending_count();
 * }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::backend::auth::sessions::SessionStore;
use crate::backend::inspections::store::InspectionStore;
use crate::backend::server::config::ServerConfig;
use crate::shared::clock::{system_clock, SharedClock};

#[derive(Debug, Clone)]
pub struct AppState {
    pub inspections: Arc<RwLock<InspectionStore>>,
    pub sessions: SessionStore,
    pub admin_password: Option<Arc<str>>,
    pub clock: SharedClock,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    pub fn with_clock(config: &ServerConfig, clock: SharedClock) -> Self {
        Self {
            inspections: Arc::new(RwLock::new(InspectionStore::new())),
            sessions: SessionStore::new(clock.clone(), config.session_ttl),
            admin_password: config.admin_password.as_deref().map(Arc::from),
            clock,
        }
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<RwLock<InspectionStore>> {
    fn from_ref(state: &AppState) -> Self {
        state.inspections.clone()
    }
}
