//! Pending inspection counter.
//!
//! Polls `GET /api/inspections/pending?limit=1` and keeps the last good
//! `pagination.totalCount`. A failed poll never resets the count: the badge
//! keeps showing the last value the server reported.

use crate::client::api::InspectionApi;
use crate::client::config::Config;
use crate::client::network::{ConnectionState, NetworkMonitor};
use crate::client::task::TaskHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone)]
pub struct PendingCountPoller {
    api: InspectionApi,
    interval: Duration,
    count: Arc<RwLock<u64>>,
}

impl PendingCountPoller {
    /// Each fetch is bounded by the api's request timeout, so a hung server
    /// cannot stall the polling loop
    pub fn new(api: InspectionApi, interval: Duration) -> Self {
        Self {
            api,
            interval,
            count: Arc::new(RwLock::new(0)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(InspectionApi::new(config.clone()), config.pending_poll_interval)
    }

    /// Last known count of inspections awaiting review
    pub async fn pending_count(&self) -> u64 {
        *self.count.read().await
    }

    /// Fetch once. Returns the count after the attempt, which is the
    /// previous value when the fetch failed.
    pub async fn refresh(&self) -> u64 {
        match self.api.pending_count().await {
            Ok(count) => {
                let mut current = self.count.write().await;
                if *current != count {
                    tracing::debug!("Pending inspections: {} -> {}", *current, count);
                }
                *current = count;
                count
            }
            Err(e) => {
                tracing::warn!("Failed to fetch pending inspection count: {}", e);
                self.pending_count().await
            }
        }
    }

    /// Fetch now, then on every interval until the handle is dropped
    pub fn start(&self) -> TaskHandle {
        let poller = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                poller.refresh().await;
            }
        });
        TaskHandle::new("pending-count", handle)
    }

    /// Refresh every time `monitor` reports the network coming back
    pub fn refresh_on_reconnect(&self, monitor: &NetworkMonitor) -> TaskHandle {
        let poller = self.clone();
        let mut changes = monitor.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(status) if status.state() == ConnectionState::Reconnecting => {
                        poller.refresh().await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Pending poller skipped {} network updates", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        TaskHandle::new("pending-count-reconnect", handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::network::{ConnectivityEvent, ConnectivityProbe, MonitorSettings, ProbeOutcome};
    use crate::shared::config::AppConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn poller_with(server_url: &str, interval: Duration, timeout: Duration) -> PendingCountPoller {
        let mut config =
            Config::with_builder(AppConfig::builder().server_url(server_url)).unwrap();
        config.request_timeout = timeout;
        PendingCountPoller::new(InspectionApi::new(config), interval)
    }

    fn poller(server: &MockServer) -> PendingCountPoller {
        poller_with(&server.uri(), Duration::from_secs(300), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn reads_total_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/inspections/pending"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{}],
                "pagination": { "page": 1, "limit": 1, "total": 12, "totalCount": 12, "totalPages": 12 }
            })))
            .mount(&server)
            .await;

        let poller = poller(&server);
        assert_eq!(poller.refresh().await, 12);
        assert_eq!(poller.pending_count().await, 12);
    }

    #[tokio::test]
    async fn server_error_keeps_previous_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/inspections/pending"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [], "pagination": { "totalCount": 4 } })),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/inspections/pending"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let poller = poller(&server);
        assert_eq!(poller.refresh().await, 4);
        assert_eq!(poller.refresh().await, 4);
        assert_eq!(poller.pending_count().await, 4);
    }

    #[tokio::test]
    async fn missing_count_reads_as_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        assert_eq!(poller(&server).refresh().await, 0);
    }

    #[tokio::test]
    async fn malformed_body_keeps_previous_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let poller = poller(&server);
        *poller.count.write().await = 9;
        assert_eq!(poller.refresh().await, 9);
    }

    #[tokio::test]
    async fn unreachable_server_keeps_zero() {
        let poller = poller_with(
            "http://127.0.0.1:9",
            Duration::from_secs(300),
            Duration::from_secs(5),
        );
        assert_eq!(poller.refresh().await, 0);
    }

    #[tokio::test]
    async fn start_fetches_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "pagination": { "totalCount": 2 } })),
            )
            .mount(&server)
            .await;

        let poller = poller(&server);
        let handle = poller.start();
        for _ in 0..50 {
            if poller.pending_count().await == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(poller.pending_count().await, 2);
        drop(handle);
    }

    #[tokio::test]
    async fn hung_request_does_not_stall_polling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/inspections/pending"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "pagination": { "totalCount": 1 } }))
                    .set_delay(Duration::from_secs(3600)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/inspections/pending"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "pagination": { "totalCount": 7 } })),
            )
            .mount(&server)
            .await;

        let poller = poller_with(
            &server.uri(),
            Duration::from_millis(100),
            Duration::from_millis(200),
        );
        let handle = poller.start();
        for _ in 0..100 {
            if poller.pending_count().await == 7 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(poller.pending_count().await, 7);
        assert!(server.received_requests().await.unwrap().len() >= 2);
        drop(handle);
    }

    #[tokio::test]
    async fn timed_out_fetch_keeps_previous_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "pagination": { "totalCount": 2 } }))
                    .set_delay(Duration::from_secs(3600)),
            )
            .mount(&server)
            .await;

        let poller = poller_with(
            &server.uri(),
            Duration::from_secs(300),
            Duration::from_millis(100),
        );
        *poller.count.write().await = 5;
        assert_eq!(poller.refresh().await, 5);
    }

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl ConnectivityProbe for Unreachable {
        async fn probe(&self) -> ProbeOutcome {
            ProbeOutcome::Unreachable
        }
    }

    #[tokio::test]
    async fn reconnect_triggers_a_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "pagination": { "totalCount": 3 } })),
            )
            .mount(&server)
            .await;

        let poller = poller(&server);
        let monitor = NetworkMonitor::new(Arc::new(Unreachable), MonitorSettings::default());
        monitor.handle_event(ConnectivityEvent::Offline);
        let _task = poller.refresh_on_reconnect(&monitor);
        assert_eq!(poller.pending_count().await, 0);

        monitor.handle_event(ConnectivityEvent::Online);
        for _ in 0..50 {
            if poller.pending_count().await == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(poller.pending_count().await, 3);
    }
}
