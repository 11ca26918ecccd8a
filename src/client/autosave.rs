//! # Auto-Save Controller
//!
//! Trailing-edge debounce around a caller-supplied save function, plus the
//! status shown in the form's save indicator.
//!
//! Each [`AutoSaveController::trigger_save`] restarts the quiet period. Once
//! the delay passes without another trigger the most recent save function
//! runs. A save that has already started is left to finish even if a newer
//! trigger arrives; the newer one simply runs after its own delay.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use custodial_sync::client::autosave::AutoSaveController;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let autosave = AutoSaveController::new(Duration::from_millis(2000));
//! autosave.trigger_save(|| async { Ok::<(), String>(()) });
//! # }
//! ```

use crate::shared::clock::{system_clock, SharedClock};
use chrono::{DateTime, Local, Utc};
use futures_util::FutureExt;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Message used when the save function fails without one
pub const SAVE_FAILED: &str = "Save failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub status: SaveStatus,
    pub last_saved: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl SaveState {
    pub fn is_saving(&self) -> bool {
        self.status == SaveStatus::Saving
    }

    /// Indicator text relative to `now`
    pub fn label(&self, now: DateTime<Utc>) -> String {
        match self.status {
            SaveStatus::Idle => "Not saved".to_string(),
            SaveStatus::Saving => "Saving...".to_string(),
            SaveStatus::Error => self
                .error_message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| SAVE_FAILED.to_string()),
            SaveStatus::Saved => match self.last_saved {
                None => "Saved".to_string(),
                Some(at) => {
                    let secs = (now - at).num_seconds().max(0);
                    if secs < 10 {
                        "Saved just now".to_string()
                    } else if secs < 60 {
                        format!("Saved {}s ago", secs)
                    } else if secs < 60 * 60 {
                        format!("Saved {}m ago", secs / 60)
                    } else {
                        format!("Saved {}", at.with_timezone(&Local).format("%H:%M"))
                    }
                }
            },
        }
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    save: SaveState,
    /// Debounce timer that has not started saving yet
    pending: Option<JoinHandle<()>>,
    /// Bumped on every trigger; a timer only fires if it is still current
    generation: u64,
    /// Bumped on reset; a save that started before a reset drops its result
    epoch: u64,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<ControllerState>,
    delay: Duration,
    clock: SharedClock,
    changes: broadcast::Sender<SaveState>,
}

#[derive(Debug, Clone)]
pub struct AutoSaveController {
    inner: Arc<Inner>,
}

impl AutoSaveController {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, system_clock())
    }

    pub fn with_clock(delay: Duration, clock: SharedClock) -> Self {
        let (changes, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ControllerState::default()),
                delay,
                clock,
                changes,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update(&self, f: impl FnOnce(&mut ControllerState)) {
        let snapshot = {
            let mut state = self.lock();
            f(&mut state);
            state.save.clone()
        };
        let _ = self.inner.changes.send(snapshot);
    }

    pub fn state(&self) -> SaveState {
        self.lock().save.clone()
    }

    pub fn status(&self) -> SaveStatus {
        self.lock().save.status
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveState> {
        self.inner.changes.subscribe()
    }

    /// Schedule `save_fn` to run after the debounce delay, replacing any
    /// save that is still waiting
    pub fn trigger_save<F, Fut, E>(&self, save_fn: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut state = self.lock();
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }
        state.generation += 1;
        let generation = state.generation;

        // A waiting timer must not keep a dropped controller alive
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let delay = self.inner.delay;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                AutoSaveController { inner }
                    .run_save(generation, save_fn)
                    .await;
            }
        }));
    }

    async fn run_save<F, Fut, E>(&self, generation: u64, save_fn: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        // Epoch read and the move to `Saving` must share one critical section
        let (epoch, snapshot) = {
            let mut state = self.lock();
            if state.generation != generation {
                return;
            }
            // From here on a newer trigger must not abort this task
            state.pending = None;
            state.save.status = SaveStatus::Saving;
            state.save.error_message = None;
            (state.epoch, state.save.clone())
        };
        let _ = self.inner.changes.send(snapshot);

        let result = AssertUnwindSafe(async move { save_fn().await })
            .catch_unwind()
            .await;

        let now = self.inner.clock.now();
        self.update(|state| {
            if state.epoch != epoch {
                return;
            }
            match result {
                Ok(Ok(())) => {
                    state.save.status = SaveStatus::Saved;
                    state.save.last_saved = Some(now);
                }
                Ok(Err(e)) => {
                    let message = e.to_string();
                    tracing::warn!("Auto-save failed: {}", message);
                    state.save.status = SaveStatus::Error;
                    state.save.error_message = Some(if message.is_empty() {
                        SAVE_FAILED.to_string()
                    } else {
                        message
                    });
                }
                Err(_) => {
                    tracing::error!("Auto-save function panicked");
                    state.save.status = SaveStatus::Error;
                    state.save.error_message = Some(SAVE_FAILED.to_string());
                }
            }
        });
    }

    /// Cancel any waiting save and go back to idle
    pub fn reset_status(&self) {
        self.update(|state| {
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            state.generation += 1;
            state.epoch += 1;
            state.save = SaveState::default();
        });
    }

    /// Record a save that happened outside the debounce cycle
    pub fn mark_saved(&self) {
        let now = self.inner.clock.now();
        self.update(|state| {
            state.save.status = SaveStatus::Saved;
            state.save.last_saved = Some(now);
            state.save.error_message = None;
        });
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
    }
}
