//! # Local Draft Store
//!
//! Keeps in-progress form state so an inspector can close the app mid-walk
//! and pick up where they left off.
//!
//! Each draft is stored as a JSON envelope `{ "data": ..., "timestamp": <epoch ms> }`
//! under one key per form type (see [`DraftKey`]). Drafts older than the
//! retention window (seven days by default) are deleted the next time they
//! are read.
//!
//! Nothing here returns an error to the caller. Storage failures are logged
//! and degrade to "nothing saved" / "nothing loaded".
//!
//! ## Usage
//!
//! ```rust,no_run
//! use custodial_sync::client::drafts::{DraftKey, DraftStore};
//! use custodial_sync::client::storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let store = DraftStore::new(Arc::new(MemoryStorage::new()));
//! store.save(DraftKey::Inspection.as_str(), &serde_json::json!({ "school": "ASA" })).await;
//! let draft: Option<serde_json::Value> = store.load(DraftKey::Inspection.as_str()).await;
//! # }
//! ```

pub mod availability;
pub mod keys;
pub mod quota;

pub use availability::{check_availability, Availability, QuotaInfo, StorageAvailability, UnavailableReason};
pub use keys::{DraftKey, KEY_PREFIX, LEGACY_KEYS, SUBMISSION_QUEUE_KEY};
pub use quota::{QuotaCheck, QuotaLevel, QuotaMonitor, QuotaWarning};

use crate::client::config::DEFAULT_DRAFT_RETENTION;
use crate::client::storage::{KeyValueStorage, StorageError};
use crate::shared::clock::{system_clock, SharedClock};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Size limits applied before writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageLimits {
    /// Largest serialized envelope accepted for one draft
    pub max_draft_bytes: u64,
    /// Largest total (keys plus values) across the whole store
    pub max_total_bytes: u64,
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            max_draft_bytes: 5 * 1024 * 1024,
            max_total_bytes: 8 * 1024 * 1024,
        }
    }
}

/// The persisted envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DraftEnvelope {
    data: serde_json::Value,
    timestamp: i64,
}

/// A loaded draft together with when it was written
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

/// Usage of the `custodial-` keys
#[derive(Debug, Clone, PartialEq)]
pub struct StorageStats {
    pub total_bytes: u64,
    pub draft_count: usize,
    pub limit_bytes: u64,
    pub usage_percent: u64,
}

/// Timestamped, expiring JSON drafts over a [`KeyValueStorage`]
#[derive(Debug, Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: SharedClock,
    retention: Duration,
    limits: StorageLimits,
}

impl DraftStore {
    /// A store with the default retention and limits on the system clock
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            clock: system_clock(),
            retention: DEFAULT_DRAFT_RETENTION,
            limits: StorageLimits::default(),
        }
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_limits(mut self, limits: StorageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    fn retention_ms(&self) -> i64 {
        i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX)
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        self.clock.now_millis().saturating_sub(timestamp) > self.retention_ms()
    }

    /// Save `data` under `key`, overwriting any earlier draft.
    ///
    /// Returns whether the draft was written. Oversized drafts, a full store
    /// and backend failures are logged and reported as `false`.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> bool {
        let envelope = match serde_json::to_value(data) {
            Ok(data) => DraftEnvelope {
                data,
                timestamp: self.clock.now_millis(),
            },
            Err(e) => {
                tracing::error!("Failed to serialize draft {}: {}", key, e);
                return false;
            }
        };
        let serialized = match serde_json::to_string(&envelope) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::error!("Failed to serialize draft {}: {}", key, e);
                return false;
            }
        };

        let size = serialized.len() as u64;
        if size > self.limits.max_draft_bytes {
            tracing::warn!("Draft too large ({}KB). Skipping save.", size / 1024);
            return false;
        }

        if !self.fits(key, &serialized).await {
            self.cleanup_old_drafts().await;
            if !self.fits(key, &serialized).await {
                tracing::warn!("Storage limit reached. Cannot save draft {}.", key);
                return false;
            }
        }

        match self.storage.set(key, &serialized).await {
            Ok(()) => true,
            Err(StorageError::QuotaExceeded) => {
                tracing::error!("Storage quota exceeded saving draft {}, cleaning up and retrying", key);
                self.cleanup_old_drafts().await;
                match self.storage.set(key, &serialized).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!("Failed to save draft {} even after cleanup: {}", key, e);
                        false
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to save draft {}: {}", key, e);
                false
            }
        }
    }

    /// Whether writing `serialized` under `key` stays within the total limit
    async fn fits(&self, key: &str, serialized: &str) -> bool {
        let current = self.total_size().await;
        let replaced = match self.storage.get(key).await {
            Ok(Some(existing)) => (key.len() + existing.len()) as u64,
            _ => 0,
        };
        current.saturating_sub(replaced) + (key.len() + serialized.len()) as u64
            <= self.limits.max_total_bytes
    }

    /// Load the draft under `key` as `T`.
    ///
    /// Expired drafts are deleted and read as `None`. Corrupt entries and
    /// backend failures also read as `None`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_draft(key).await.map(|draft| draft.data)
    }

    /// Like [`DraftStore::load`], keeping the save time
    pub async fn load_draft<T: DeserializeOwned>(&self, key: &str) -> Option<Draft<T>> {
        let stored = match self.storage.get(key).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Failed to load draft {}: {}", key, e);
                return None;
            }
        };

        let envelope: DraftEnvelope = match serde_json::from_str(&stored) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!("Failed to parse draft {}: {}", key, e);
                return None;
            }
        };

        if self.is_expired(envelope.timestamp) {
            tracing::info!("Discarding expired draft {}", key);
            self.clear(key).await;
            return None;
        }

        let saved_at = Utc.timestamp_millis_opt(envelope.timestamp).single()?;
        match serde_json::from_value(envelope.data) {
            Ok(data) => Some(Draft { data, saved_at }),
            Err(e) => {
                tracing::error!("Draft {} does not match the expected shape: {}", key, e);
                None
            }
        }
    }

    /// Remove the draft under `key`
    pub async fn clear(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            tracing::error!("Failed to clear draft {}: {}", key, e);
        }
    }

    /// Remove every key in `keys`
    pub async fn clear_all(&self, keys: &[&str]) {
        for key in keys {
            self.clear(key).await;
        }
    }

    /// Remove every key this crate knows about, legacy ones included
    pub async fn clear_known(&self) {
        self.clear_all(&DraftKey::all_known()).await;
    }

    /// Remove expired or unparseable `custodial-` entries. Returns how many
    /// were removed.
    pub async fn cleanup_old_drafts(&self) -> usize {
        let keys = match self.storage.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!("Failed to cleanup old drafts: {}", e);
                return 0;
            }
        };

        let mut to_remove = Vec::new();
        for key in keys.into_iter().filter(|k| k.starts_with(KEY_PREFIX)) {
            let Ok(Some(stored)) = self.storage.get(&key).await else {
                continue;
            };
            match serde_json::from_str::<DraftEnvelope>(&stored) {
                Ok(envelope) if self.is_expired(envelope.timestamp) => to_remove.push(key),
                Ok(_) => {}
                Err(_) => to_remove.push(key),
            }
        }

        for key in &to_remove {
            self.clear(key).await;
        }
        tracing::info!("Cleaned up {} old drafts", to_remove.len());
        to_remove.len()
    }

    /// Drop drafts written by older clients, then clean up expired ones
    pub async fn migrate_legacy_drafts(&self) {
        for key in LEGACY_KEYS {
            match self.storage.get(key).await {
                Ok(Some(_)) => {
                    tracing::info!("Removing legacy draft store {}", key);
                    self.clear(key).await;
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Failed to migrate legacy drafts {}: {}", key, e),
            }
        }
        self.cleanup_old_drafts().await;
    }

    async fn total_size(&self) -> u64 {
        let Ok(keys) = self.storage.keys().await else {
            return 0;
        };
        let mut total = 0u64;
        for key in keys {
            if let Ok(Some(value)) = self.storage.get(&key).await {
                total += (key.len() + value.len()) as u64;
            }
        }
        total
    }

    /// Size and count of stored drafts
    pub async fn stats(&self) -> StorageStats {
        let total_bytes = self.total_size().await;
        let draft_count = self
            .storage
            .keys()
            .await
            .map(|keys| keys.iter().filter(|k| k.starts_with(KEY_PREFIX)).count())
            .unwrap_or(0);
        let limit_bytes = self.limits.max_total_bytes;
        let usage_percent = if limit_bytes == 0 {
            0
        } else {
            ((total_bytes as f64 / limit_bytes as f64) * 100.0).round() as u64
        };

        StorageStats {
            total_bytes,
            draft_count,
            limit_bytes,
            usage_percent,
        }
    }

    /// Probe whether the backing storage is usable
    pub async fn availability(&self) -> StorageAvailability {
        check_availability(self.storage.as_ref()).await
    }
}
