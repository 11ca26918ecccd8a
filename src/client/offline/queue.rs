//! # Submission Queue
//!
//! Submissions that could not reach the server. The whole queue is one draft
//! envelope under [`SUBMISSION_QUEUE_KEY`], so it survives a restart and is
//! subject to the same retention as the drafts themselves. Every write
//! refreshes the envelope timestamp.
//!
//! A flush sends the queued payloads in order. A retryable failure stops the
//! flush and leaves the rest queued; a rejection drops that one entry.

use crate::client::api::InspectionApi;
use crate::client::drafts::{DraftStore, SUBMISSION_QUEUE_KEY};
use crate::shared::submission::SubmissionPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One submission waiting for the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedSubmission {
    pub id: Uuid,
    /// Draft slot the form was typed into; cleared once the payload is sent
    pub draft_key: String,
    pub payload: SubmissionPayload,
    pub queued_at: DateTime<Utc>,
    /// Failed send attempts so far
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// A queued submission the server refused
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSubmission {
    pub id: Uuid,
    pub draft_key: String,
    pub error: String,
}

/// Outcome of [`SubmissionQueue::flush`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    /// Server ids of the submissions that went through
    pub submitted: Vec<Uuid>,
    /// Entries still queued afterwards
    pub requeued: usize,
    pub rejected: Vec<RejectedSubmission>,
}

impl FlushReport {
    /// Nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty() && self.requeued == 0 && self.rejected.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionQueue {
    store: DraftStore,
    /// Held for every read-modify-write of the stored list
    entries: Arc<Mutex<()>>,
    /// Held for the duration of a flush
    flushing: Arc<Mutex<()>>,
}

impl SubmissionQueue {
    pub fn new(store: DraftStore) -> Self {
        Self {
            store,
            entries: Arc::new(Mutex::new(())),
            flushing: Arc::new(Mutex::new(())),
        }
    }

    async fn read(&self) -> Vec<QueuedSubmission> {
        self.store
            .load::<Vec<QueuedSubmission>>(SUBMISSION_QUEUE_KEY)
            .await
            .unwrap_or_default()
    }

    async fn write(&self, items: &[QueuedSubmission]) -> bool {
        if items.is_empty() {
            self.store.clear(SUBMISSION_QUEUE_KEY).await;
            return true;
        }
        self.store.save(SUBMISSION_QUEUE_KEY, items).await
    }

    /// Queue `payload`, typed into the draft slot `draft_key`.
    ///
    /// Queuing a payload that is already waiting returns the existing id.
    /// Returns `None` when the queue could not be persisted.
    pub async fn enqueue(&self, draft_key: &str, payload: &SubmissionPayload) -> Option<Uuid> {
        let _guard = self.entries.lock().await;
        let mut items = self.read().await;
        if let Some(existing) = items.iter().find(|item| &item.payload == payload) {
            tracing::debug!("Submission already queued as {}", existing.id);
            return Some(existing.id);
        }

        let item = QueuedSubmission {
            id: Uuid::new_v4(),
            draft_key: draft_key.to_string(),
            payload: payload.clone(),
            queued_at: self.store.clock().now(),
            attempts: 0,
            last_error: None,
        };
        let id = item.id;
        items.push(item);

        if self.write(&items).await {
            tracing::info!("Queued {} submission {} ({} waiting)", payload.form_type(), id, items.len());
            Some(id)
        } else {
            tracing::error!("Could not persist queued submission for {}", draft_key);
            None
        }
    }

    /// Everything waiting, oldest first
    pub async fn pending(&self) -> Vec<QueuedSubmission> {
        let _guard = self.entries.lock().await;
        self.read().await
    }

    pub async fn len(&self) -> usize {
        self.pending().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop queued copies of `payload`, e.g. after it was sent directly
    pub async fn remove_matching(&self, payload: &SubmissionPayload) -> usize {
        let _guard = self.entries.lock().await;
        let mut items = self.read().await;
        let before = items.len();
        items.retain(|item| &item.payload != payload);
        let removed = before - items.len();
        if removed > 0 {
            self.write(&items).await;
        }
        removed
    }

    /// Send every queued submission through `api`.
    ///
    /// A flush already in progress makes this a no-op returning an empty
    /// report.
    pub async fn flush(&self, api: &InspectionApi) -> FlushReport {
        let Ok(_flushing) = self.flushing.try_lock() else {
            tracing::debug!("Submission queue flush already in progress");
            return FlushReport::default();
        };

        let snapshot = self.pending().await;
        if snapshot.is_empty() {
            return FlushReport::default();
        }
        tracing::info!("Flushing {} queued submissions", snapshot.len());

        let mut report = FlushReport::default();
        let mut finished = Vec::new();
        let mut failure: Option<(Uuid, String)> = None;

        for item in &snapshot {
            match api.submit(&item.payload).await {
                Ok(receipt) => {
                    report.submitted.push(receipt.id);
                    finished.push(item.id);
                    self.clear_draft_if_unchanged(item).await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!("Queued submission {} deferred again: {}", item.id, e);
                    failure = Some((item.id, e.to_string()));
                    break;
                }
                Err(e) => {
                    tracing::warn!("Dropping queued submission {}: {}", item.id, e);
                    report.rejected.push(RejectedSubmission {
                        id: item.id,
                        draft_key: item.draft_key.clone(),
                        error: e.to_string(),
                    });
                    finished.push(item.id);
                }
            }
        }

        let _guard = self.entries.lock().await;
        let mut items = self.read().await;
        items.retain(|item| !finished.contains(&item.id));
        if let Some((id, error)) = failure {
            if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                item.attempts += 1;
                item.last_error = Some(error);
            }
        }
        self.write(&items).await;
        report.requeued = items.len();

        tracing::info!(
            "Queue flush: {} sent, {} rejected, {} waiting",
            report.submitted.len(),
            report.rejected.len(),
            report.requeued
        );
        report
    }

    /// The draft is only cleared when nobody edited it after queuing
    async fn clear_draft_if_unchanged(&self, item: &QueuedSubmission) {
        let Some(draft) = self
            .store
            .load_draft::<serde_json::Value>(&item.draft_key)
            .await
        else {
            return;
        };
        if draft.saved_at <= item.queued_at {
            self.store.clear(&item.draft_key).await;
        } else {
            tracing::debug!("Keeping {}: edited after it was queued", item.draft_key);
        }
    }
}
