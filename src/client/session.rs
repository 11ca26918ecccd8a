//! # Form Session
//!
//! Glue for one open form: edits are auto-saved as a local draft, and
//! submission goes to the server only when the network monitor says we are
//! online. Anything that cannot be sent now is put on the
//! [`SubmissionQueue`] and the draft is kept until the queue delivers it.

use crate::client::api::{ApiError, InspectionApi};
use crate::client::autosave::AutoSaveController;
use crate::client::drafts::DraftStore;
use crate::client::network::NetworkMonitor;
use crate::client::offline::SubmissionQueue;
use crate::client::pending::PendingCountPoller;
use crate::shared::submission::SubmissionPayload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Result of [`FormSession::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the server under this id
    Submitted(Uuid),
    /// Not sent (offline or server unreachable); queued for the next
    /// reconnect and the draft is kept
    Deferred,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    key: String,
    store: DraftStore,
    autosave: AutoSaveController,
    monitor: NetworkMonitor,
    api: InspectionApi,
    poller: PendingCountPoller,
    queue: SubmissionQueue,
    /// Bumped when a submission lands; draft writes from before that are dropped
    draft_revision: Arc<AtomicU64>,
    /// Draft writes and the post-submit clear never interleave
    draft_lock: Arc<Mutex<()>>,
}

impl FormSession {
    pub fn new(
        key: impl Into<String>,
        store: DraftStore,
        autosave: AutoSaveController,
        monitor: NetworkMonitor,
        api: InspectionApi,
        poller: PendingCountPoller,
    ) -> Self {
        let queue = SubmissionQueue::new(store.clone());
        Self {
            key: key.into(),
            store,
            autosave,
            monitor,
            api,
            poller,
            queue,
            draft_revision: Arc::new(AtomicU64::new(0)),
            draft_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Share a queue with an [`OfflineSync`](crate::client::offline::OfflineSync)
    /// worker instead of the session's own
    pub fn with_queue(mut self, queue: SubmissionQueue) -> Self {
        self.queue = queue;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn autosave(&self) -> &AutoSaveController {
        &self.autosave
    }

    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }

    pub fn queue(&self) -> &SubmissionQueue {
        &self.queue
    }

    /// The saved draft for this form, if one is still within retention
    pub async fn restore<T: DeserializeOwned>(&self) -> Option<T> {
        let draft = self.store.load(&self.key).await;
        if draft.is_some() {
            tracing::info!("Restored draft {}", self.key);
        }
        draft
    }

    /// Schedule a debounced draft save of the current form state
    pub fn record_edit<T>(&self, data: T)
    where
        T: Serialize + Send + Sync + 'static,
    {
        let store = self.store.clone();
        let key = self.key.clone();
        let lock = self.draft_lock.clone();
        let current = self.draft_revision.clone();
        let revision = current.load(Ordering::SeqCst);
        self.autosave.trigger_save(move || async move {
            let _guard = lock.lock().await;
            if current.load(Ordering::SeqCst) != revision {
                tracing::debug!("Skipping draft save for already submitted {}", key);
                return Ok(());
            }
            if store.save(&key, &data).await {
                Ok(())
            } else {
                Err("Could not save draft on this device")
            }
        });
    }

    async fn defer(&self, payload: &SubmissionPayload) -> SubmitOutcome {
        if self.queue.enqueue(&self.key, payload).await.is_none() {
            tracing::warn!("Could not queue {}; it stays a draft", self.key);
        }
        SubmitOutcome::Deferred
    }

    /// Send the form if we can, otherwise queue it and keep the draft.
    ///
    /// Validation failures, whether local or reported by the server, come
    /// back as errors; the draft is left alone so the user can fix it.
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitOutcome, ApiError> {
        payload.validate()?;

        if !self.monitor.is_online() {
            tracing::info!("Offline, queuing {}", self.key);
            return Ok(self.defer(payload).await);
        }

        match self.api.submit(payload).await {
            Ok(receipt) => {
                // Drop any debounced save so it cannot recreate the draft
                self.autosave.reset_status();
                self.draft_revision.fetch_add(1, Ordering::SeqCst);
                {
                    let _guard = self.draft_lock.lock().await;
                    self.store.clear(&self.key).await;
                }
                self.queue.remove_matching(payload).await;
                self.autosave.mark_saved();
                self.poller.refresh().await;
                Ok(SubmitOutcome::Submitted(receipt.id))
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!("Submission deferred: {}", e);
                Ok(self.defer(payload).await)
            }
            Err(e) => Err(e),
        }
    }
}
