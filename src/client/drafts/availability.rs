//! Storage availability probe.
//!
//! Writes, reads back and deletes a sentinel entry. A backend can be present
//! and still unusable: private browsing, a read-only data directory, a full
//! disk. This is how a form finds out before the inspector types anything.

use crate::client::storage::{KeyValueStorage, QuotaEstimate, StorageError};
use serde::Serialize;
use std::fmt;

const TEST_KEY: &str = "__storage_test__";
const TEST_VALUE: &str = "test";

/// Why storage cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UnavailableReason {
    Unsupported(String),
    QuotaExceeded,
    AccessDenied(String),
    /// The sentinel read back differently from what was written
    VerificationFailed,
    Other(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(detail) => write!(f, "Storage is not supported: {}", detail),
            Self::QuotaExceeded => f.write_str("Storage quota exceeded"),
            Self::AccessDenied(_) => {
                f.write_str("Storage access denied (private browsing or security policy)")
            }
            Self::VerificationFailed => f.write_str("Storage read/write verification failed"),
            Self::Other(message) => f.write_str(message),
        }
    }
}

impl From<StorageError> for UnavailableReason {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QuotaExceeded => Self::QuotaExceeded,
            StorageError::AccessDenied(detail) => Self::AccessDenied(detail),
            StorageError::Unsupported(detail) => Self::Unsupported(detail),
            StorageError::Backend(message) => Self::Other(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

/// Usage figures derived from a backend estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaInfo {
    pub usage: u64,
    pub total: u64,
    /// Percent used, rounded to two decimals
    pub percentage: f64,
}

impl From<QuotaEstimate> for QuotaInfo {
    fn from(estimate: QuotaEstimate) -> Self {
        let percentage = if estimate.quota > 0 {
            ((estimate.usage as f64 / estimate.quota as f64) * 10_000.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            usage: estimate.usage,
            total: estimate.quota,
            percentage,
        }
    }
}

/// Result of [`check_availability`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageAvailability {
    pub availability: Availability,
    /// Only reported when storage is available and the backend knows its size
    pub quota: Option<QuotaInfo>,
}

impl StorageAvailability {
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }

    /// Human-readable reason, when unavailable
    pub fn error(&self) -> Option<String> {
        match &self.availability {
            Availability::Available => None,
            Availability::Unavailable(reason) => Some(reason.to_string()),
        }
    }
}

async fn probe(storage: &dyn KeyValueStorage) -> Result<(), UnavailableReason> {
    storage.set(TEST_KEY, TEST_VALUE).await?;
    let retrieved = storage.get(TEST_KEY).await?;
    storage.remove(TEST_KEY).await?;

    if retrieved.as_deref() != Some(TEST_VALUE) {
        return Err(UnavailableReason::VerificationFailed);
    }
    Ok(())
}

/// Probe `storage` with a sentinel write/read/delete
pub async fn check_availability(storage: &dyn KeyValueStorage) -> StorageAvailability {
    match probe(storage).await {
        Ok(()) => StorageAvailability {
            availability: Availability::Available,
            quota: storage.estimate().await.map(QuotaInfo::from),
        },
        Err(reason) => {
            tracing::warn!("Draft storage unavailable: {}", reason);
            StorageAvailability {
                availability: Availability::Unavailable(reason),
                quota: None,
            }
        }
    }
}
