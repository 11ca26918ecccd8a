//! # Offline Submission Sync
//!
//! Submissions made without a connection are queued locally and sent once
//! the network is back.
//!
//! ## Architecture
//!
//! - **Submission Queue**: persisted list of payloads waiting to be sent
//! - **Sync worker**: flushes the queue when the network monitor reports a
//!   reconnect, and on a fixed interval while online
//!
//! After a reconnect the pending-inspection count is refreshed as well, so
//! the review badge catches up with whatever was sent.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use custodial_sync::client::offline::{OfflineSync, SubmissionQueue};
//! use custodial_sync::client::{Config, InspectionApi, NetworkMonitor, PendingCountPoller};
//! use custodial_sync::client::drafts::DraftStore;
//! use custodial_sync::client::storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = Config::new();
//! let queue = SubmissionQueue::new(DraftStore::new(Arc::new(MemoryStorage::new())));
//! let sync = OfflineSync::new(
//!     queue,
//!     InspectionApi::new(config.clone()),
//!     NetworkMonitor::from_config(&config),
//!     PendingCountPoller::from_config(&config),
//!     config.queue_flush_interval,
//! );
//! let _worker = sync.start();
//! # }
//! ```

pub mod queue;

pub use queue::{FlushReport, QueuedSubmission, RejectedSubmission, SubmissionQueue};

use crate::client::api::InspectionApi;
use crate::client::network::{ConnectionState, NetworkMonitor};
use crate::client::pending::PendingCountPoller;
use crate::client::task::TaskHandle;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;

/// Sends queued submissions whenever the network allows it
#[derive(Debug, Clone)]
pub struct OfflineSync {
    queue: SubmissionQueue,
    api: InspectionApi,
    monitor: NetworkMonitor,
    poller: PendingCountPoller,
    flush_interval: Duration,
}

impl OfflineSync {
    pub fn new(
        queue: SubmissionQueue,
        api: InspectionApi,
        monitor: NetworkMonitor,
        poller: PendingCountPoller,
        flush_interval: Duration,
    ) -> Self {
        Self {
            queue,
            api,
            monitor,
            poller,
            flush_interval,
        }
    }

    pub fn queue(&self) -> &SubmissionQueue {
        &self.queue
    }

    /// Flush now if the monitor says we are online. The pending count is
    /// refreshed when anything was sent.
    pub async fn sync_now(&self) -> FlushReport {
        if !self.monitor.is_online() {
            tracing::debug!("Offline, leaving submission queue alone");
            return FlushReport::default();
        }
        let report = self.queue.flush(&self.api).await;
        if !report.submitted.is_empty() {
            self.poller.refresh().await;
        }
        report
    }

    async fn on_reconnect(&self) {
        tracing::info!("Network back, syncing queued submissions");
        let report = self.queue.flush(&self.api).await;
        if !report.is_empty() {
            tracing::debug!("Reconnect flush: {:?}", report);
        }
        self.poller.refresh().await;
    }

    /// Flush once now, on every reconnect, and every flush interval while
    /// online. Dropping the handle stops the worker.
    pub fn start(&self) -> TaskHandle {
        let sync = self.clone();
        let mut changes = self.monitor.subscribe();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sync.flush_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        sync.sync_now().await;
                    }
                    change = changes.recv() => match change {
                        Ok(status) if status.state() == ConnectionState::Reconnecting => {
                            sync.on_reconnect().await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!("Offline sync skipped {} network updates", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });
        TaskHandle::new("offline-sync", handle)
    }
}
