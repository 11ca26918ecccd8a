/**
 * Admin Session Management
 *
 * Opaque bearer tokens for the admin review screens. Sessions live in memory
 * and expire after a fixed lifetime measured on the injected clock, so tests
 * can expire a session without waiting.
 */

use crate::shared::clock::SharedClock;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Prefix on every issued token
pub const TOKEN_PREFIX: &str = "admin_";

/// An issued admin session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Registry of live admin sessions
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    clock: SharedClock,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(clock: SharedClock, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(8)),
        }
    }

    /// Issue a new session token
    pub async fn create(&self) -> AdminSession {
        let token = format!(
            "{}{}{}",
            TOKEN_PREFIX,
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        let expires_at = self.clock.now() + self.ttl;
        self.sessions.write().await.insert(token.clone(), expires_at);
        tracing::info!("Admin session created, expires {}", expires_at);
        AdminSession {
            session_token: token,
            expires_at,
        }
    }

    /// Whether `token` names a live session. Expired sessions are dropped.
    pub async fn validate(&self, token: &str) -> bool {
        let now = self.clock.now();
        let expires_at = match self.sessions.read().await.get(token) {
            Some(expires_at) => *expires_at,
            None => return false,
        };
        if expires_at > now {
            return true;
        }
        self.sessions.write().await.remove(token);
        tracing::debug!("Admin session expired");
        false
    }

    /// End a session. Returns false when it did not exist.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, expires_at| *expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
