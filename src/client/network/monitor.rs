//! Online/offline state machine.
//!
//! ```text
//!            offline event / failed poll
//!   online ─────────────────────────────▶ offline
//!     ▲                                      │
//!     │ window elapses      online event /   │
//!     │                     reachable poll   ▼
//!     └──────────────────────────────── reconnecting
//! ```
//!
//! `reconnecting` is `is_online && was_offline`. Going offline while
//! reconnecting cancels the window immediately.

use super::probe::{ConnectivityProbe, HttpProbe, ProbeOutcome};
use crate::client::config::Config;
use crate::client::task::TaskHandle;
use crate::shared::clock::{system_clock, SharedClock};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Snapshot of connectivity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub is_online: bool,
    /// True only during the reconnect window after an offline→online edge
    pub was_offline: bool,
    pub last_checked: DateTime<Utc>,
}

impl NetworkStatus {
    pub fn state(&self) -> ConnectionState {
        match (self.is_online, self.was_offline) {
            (false, _) => ConnectionState::Offline,
            (true, true) => ConnectionState::Reconnecting,
            (true, false) => ConnectionState::Online,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Online,
    Offline,
    Reconnecting,
}

impl ConnectionState {
    /// Indicator text
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Online => "Online",
            ConnectionState::Offline => "Offline",
            ConnectionState::Reconnecting => "Back online",
        }
    }
}

/// Platform connectivity notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Timing knobs for the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub reconnect_window: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5000),
            poll_timeout: Duration::from_millis(3000),
            reconnect_window: Duration::from_millis(3000),
        }
    }
}

impl MonitorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.connectivity_poll_interval,
            poll_timeout: config.connectivity_timeout,
            reconnect_window: config.reconnect_window,
        }
    }
}

#[derive(Debug)]
struct MonitorState {
    status: NetworkStatus,
    reconnect_timer: Option<JoinHandle<()>>,
    /// Bumped whenever the reconnect window is started or cancelled, so a
    /// timer that already woke up cannot clear a newer window
    generation: u64,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<MonitorState>,
    probe: Arc<dyn ConnectivityProbe>,
    settings: MonitorSettings,
    clock: SharedClock,
    changes: broadcast::Sender<NetworkStatus>,
}

/// Connectivity tracker. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    inner: Arc<Inner>,
}

impl NetworkMonitor {
    /// A monitor that starts out assuming it is online
    pub fn new(probe: Arc<dyn ConnectivityProbe>, settings: MonitorSettings) -> Self {
        Self::with_initial(probe, settings, true, system_clock())
    }

    pub fn with_initial(
        probe: Arc<dyn ConnectivityProbe>,
        settings: MonitorSettings,
        initially_online: bool,
        clock: SharedClock,
    ) -> Self {
        let (changes, _) = broadcast::channel(64);
        let status = NetworkStatus {
            is_online: initially_online,
            was_offline: false,
            last_checked: clock.now(),
        };
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(MonitorState {
                    status,
                    reconnect_timer: None,
                    generation: 0,
                }),
                probe,
                settings,
                clock,
                changes,
            }),
        }
    }

    /// A monitor probing the configured health endpoint over HTTP
    pub fn from_config(config: &Config) -> Self {
        let probe = HttpProbe::new(config.health_url(), config.connectivity_timeout);
        Self::new(Arc::new(probe), MonitorSettings::from_config(config))
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, status: NetworkStatus) {
        // No subscribers is fine
        let _ = self.inner.changes.send(status);
    }

    pub fn status(&self) -> NetworkStatus {
        self.lock().status.clone()
    }

    pub fn is_online(&self) -> bool {
        self.lock().status.is_online
    }

    pub fn was_offline(&self) -> bool {
        self.lock().status.was_offline
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.lock().status.state()
    }

    /// Receive every status change from now on
    pub fn subscribe(&self) -> broadcast::Receiver<NetworkStatus> {
        self.inner.changes.subscribe()
    }

    /// Feed a platform connectivity event
    pub fn handle_event(&self, event: ConnectivityEvent) {
        match event {
            ConnectivityEvent::Online => self.go_online(),
            ConnectivityEvent::Offline => self.go_offline(),
        }
    }

    fn go_online(&self) {
        let snapshot = {
            let mut state = self.lock();
            state.status.last_checked = self.inner.clock.now();

            if !state.status.is_online {
                tracing::info!("Network: back online");
                state.status.was_offline = true;
                if let Some(timer) = state.reconnect_timer.take() {
                    timer.abort();
                }
                state.generation += 1;
                state.reconnect_timer = Some(self.spawn_reconnect_timer(state.generation));
            }

            state.status.is_online = true;
            state.status.clone()
        };
        self.publish(snapshot);
    }

    fn go_offline(&self) {
        let snapshot = {
            let mut state = self.lock();
            if state.status.is_online {
                tracing::warn!("Network: offline");
            }
            state.status.last_checked = self.inner.clock.now();
            state.status.is_online = false;
            state.status.was_offline = false;
            if let Some(timer) = state.reconnect_timer.take() {
                timer.abort();
            }
            state.generation += 1;
            state.status.clone()
        };
        self.publish(snapshot);
    }

    fn spawn_reconnect_timer(&self, generation: u64) -> JoinHandle<()> {
        let monitor = self.clone();
        let window = self.inner.settings.reconnect_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let snapshot = {
                let mut state = monitor.lock();
                if state.generation != generation {
                    return;
                }
                state.status.was_offline = false;
                state.reconnect_timer = None;
                state.status.clone()
            };
            monitor.publish(snapshot);
        })
    }

    /// Run one connectivity probe and apply its result
    pub async fn poll_once(&self) -> ProbeOutcome {
        let outcome = match tokio::time::timeout(
            self.inner.settings.poll_timeout,
            self.inner.probe.probe(),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Unreachable,
        };

        let was_online = {
            let mut state = self.lock();
            state.status.last_checked = self.inner.clock.now();
            state.status.is_online
        };

        match (outcome, was_online) {
            (ProbeOutcome::Reachable, false) => self.go_online(),
            (ProbeOutcome::Unreachable, true) => self.go_offline(),
            _ => {}
        }
        outcome
    }

    /// Start polling: once immediately, then every poll interval. Dropping
    /// the returned handle stops polling and cancels any reconnect window.
    pub fn start(&self) -> MonitorHandle {
        let monitor = self.clone();
        let interval = self.inner.settings.poll_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                monitor.poll_once().await;
            }
        });
        MonitorHandle {
            monitor: self.clone(),
            poller: TaskHandle::new("network-monitor", handle),
        }
    }

    fn cancel_reconnect_window(&self) {
        let mut state = self.lock();
        if let Some(timer) = state.reconnect_timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.status.was_offline = false;
    }
}

/// A running monitor. Stops everything on drop.
#[derive(Debug)]
pub struct MonitorHandle {
    monitor: NetworkMonitor,
    poller: TaskHandle,
}

impl MonitorHandle {
    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.poller.stop();
        self.monitor.cancel_reconnect_window();
    }
}
