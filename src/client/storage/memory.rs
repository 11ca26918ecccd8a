//! In-process storage backend.

use super::{KeyValueStorage, QuotaEstimate, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory [`KeyValueStorage`].
///
/// With a quota set, a write that would push the total size (key plus value
/// bytes, the same measure the draft store uses) past the quota fails with
/// [`StorageError::QuotaExceeded`]. [`MemoryStorage::fail_with`] makes every
/// subsequent call fail, which is how tests simulate a disabled or blocked
/// store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    quota_bytes: Option<u64>,
    failure: RwLock<Option<StorageError>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes beyond `quota_bytes`
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Make every following operation fail with `error`
    pub async fn fail_with(&self, error: StorageError) {
        *self.failure.write().await = Some(error);
    }

    /// Clear an injected failure
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    /// Write a raw value, bypassing failure injection and quota
    pub async fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    async fn check_failure(&self) -> Result<(), StorageError> {
        match self.failure.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn used_bytes(entries: &BTreeMap<String, String>) -> u64 {
        entries
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_failure().await?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_failure().await?;
        let mut entries = self.entries.write().await;

        if let Some(quota) = self.quota_bytes {
            let existing = entries
                .get(key)
                .map(|v| (key.len() + v.len()) as u64)
                .unwrap_or(0);
            let projected = Self::used_bytes(&entries) - existing + (key.len() + value.len()) as u64;
            if projected > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_failure().await?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.check_failure().await?;
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn estimate(&self) -> Option<QuotaEstimate> {
        let quota = self.quota_bytes?;
        let usage = Self::used_bytes(&*self.entries.read().await);
        Some(QuotaEstimate { usage, quota })
    }
}
