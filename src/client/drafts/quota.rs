//! Storage quota monitoring.
//!
//! Warns once the backend reports 80 % usage and again, more urgently, at
//! 95 %. Warnings are de-duplicated so a periodic check does not repeat the
//! same message every tick: critical warnings once per whole percent, normal
//! warnings once per 5 % bucket.

use super::availability::QuotaInfo;
use crate::client::storage::KeyValueStorage;
use crate::client::task::TaskHandle;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Usage percentage at which a warning is raised
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Usage percentage at which a critical warning is raised
pub const CRITICAL_THRESHOLD: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLevel {
    Ok,
    Warning,
    Critical,
}

impl QuotaLevel {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= CRITICAL_THRESHOLD {
            QuotaLevel::Critical
        } else if percentage >= WARNING_THRESHOLD {
            QuotaLevel::Warning
        } else {
            QuotaLevel::Ok
        }
    }
}

/// A warning raised by [`QuotaMonitor::check`]
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaWarning {
    pub level: QuotaLevel,
    pub percentage: f64,
    pub message: String,
}

/// Result of [`QuotaMonitor::check_before_save`]
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaCheck {
    pub should_warn: bool,
    pub percentage: f64,
    pub message: String,
    pub level: QuotaLevel,
}

/// Render a byte count as KB below one megabyte and MB above
pub fn format_size(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    if mb < 1.0 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", mb)
    }
}

#[derive(Debug, Default)]
pub struct QuotaMonitor {
    warnings_shown: Mutex<HashSet<String>>,
}

impl QuotaMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one usage reading, returning a warning only the first time
    /// its level and bucket are seen
    pub fn evaluate(&self, info: QuotaInfo) -> Option<QuotaWarning> {
        if info.percentage == 0.0 {
            return None;
        }
        let percentage = info.percentage;
        let (level, warning_key, message) = match QuotaLevel::for_percentage(percentage) {
            QuotaLevel::Ok => return None,
            QuotaLevel::Critical => (
                QuotaLevel::Critical,
                format!("critical-{}", percentage.floor() as u64),
                format!(
                    "Storage is nearly full ({:.1}% used). Using {} of {} available. \
                     Clear old drafts to keep saving.",
                    percentage,
                    format_size(info.usage),
                    format_size(info.total)
                ),
            ),
            QuotaLevel::Warning => (
                QuotaLevel::Warning,
                format!("warning-{}", ((percentage / 5.0).floor() as u64) * 5),
                format!(
                    "Storage is {:.1}% full. Using {} of {} available. \
                     Consider clearing old drafts.",
                    percentage,
                    format_size(info.usage),
                    format_size(info.total)
                ),
            ),
        };

        let mut shown = self
            .warnings_shown
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !shown.insert(warning_key) {
            return None;
        }

        tracing::warn!("Storage at {:.1}% capacity ({:?})", percentage, level);
        Some(QuotaWarning {
            level,
            percentage,
            message,
        })
    }

    /// Read the backend estimate and evaluate it
    pub async fn check(&self, storage: &dyn KeyValueStorage) -> Option<QuotaWarning> {
        let estimate = storage.estimate().await?;
        self.evaluate(estimate.into())
    }

    /// One-off check before a large save; never de-duplicated
    pub async fn check_before_save(storage: &dyn KeyValueStorage) -> QuotaCheck {
        let Some(info) = storage.estimate().await.map(QuotaInfo::from) else {
            return QuotaCheck {
                should_warn: false,
                percentage: 0.0,
                message: "Quota information not available".to_string(),
                level: QuotaLevel::Ok,
            };
        };

        let percentage = info.percentage;
        match QuotaLevel::for_percentage(percentage) {
            QuotaLevel::Critical => QuotaCheck {
                should_warn: true,
                percentage,
                message: format!("Storage is {:.1}% full. Save may fail.", percentage),
                level: QuotaLevel::Critical,
            },
            QuotaLevel::Warning => QuotaCheck {
                should_warn: true,
                percentage,
                message: format!("Storage is {:.1}% full. Consider clearing old data.", percentage),
                level: QuotaLevel::Warning,
            },
            QuotaLevel::Ok => QuotaCheck {
                should_warn: false,
                percentage,
                message: format!("Storage usage: {:.1}%", percentage),
                level: QuotaLevel::Ok,
            },
        }
    }

    /// Check now and then every `interval`, handing new warnings to `on_warning`
    pub fn spawn<F>(
        self: Arc<Self>,
        storage: Arc<dyn KeyValueStorage>,
        interval: Duration,
        on_warning: F,
    ) -> TaskHandle
    where
        F: Fn(QuotaWarning) + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Some(warning) = self.check(storage.as_ref()).await {
                    on_warning(warning);
                }
            }
        });
        TaskHandle::new("quota-monitor", handle)
    }
}
