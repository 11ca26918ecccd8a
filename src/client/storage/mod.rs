//! # Persistent Key/Value Storage
//!
//! The draft store never talks to a concrete backend directly. It goes through
//! [`KeyValueStorage`], a string-to-string map with the same surface as browser
//! local storage: get, set, remove, list keys, and an optional usage estimate.
//!
//! ## Backends
//!
//! - [`MemoryStorage`]: in-process map with an optional byte quota and
//!   failure injection. Used for ephemeral sessions and tests.
//! - [`SqliteStorage`]: a single-table SQLite file under the platform data
//!   directory, via `sqlx`.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    /// The write would exceed the backend's capacity
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// The backend refused access (read-only file, policy block, private mode)
    #[error("Storage access denied: {0}")]
    AccessDenied(String),

    /// No usable backend on this platform
    #[error("Storage is not supported: {0}")]
    Unsupported(String),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("disk is full") || lowered.contains("database or disk is full") {
            StorageError::QuotaExceeded
        } else if lowered.contains("readonly")
            || lowered.contains("read-only")
            || lowered.contains("permission denied")
        {
            StorageError::AccessDenied(message)
        } else {
            StorageError::Backend(message)
        }
    }
}

/// Usage estimate reported by a backend that knows its capacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotaEstimate {
    /// Bytes in use
    pub usage: u64,
    /// Bytes available in total
    pub quota: u64,
}

/// A string key/value store
#[async_trait]
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    async fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Capacity estimate, if the backend can report one
    async fn estimate(&self) -> Option<QuotaEstimate> {
        None
    }
}
