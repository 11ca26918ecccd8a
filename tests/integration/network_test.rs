//! Network monitor tests against a real HTTP health endpoint

use crate::common::{mount_health, ScriptedProbe};
use custodial_sync::client::network::{
    ConnectionState, HttpProbe, MonitorSettings, NetworkMonitor, ProbeOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

#[tokio::test(start_paused = true)]
async fn test_failed_then_successful_poll_opens_reconnect_window() {
    let probe = ScriptedProbe::new(&[ProbeOutcome::Unreachable, ProbeOutcome::Reachable]);
    let monitor = NetworkMonitor::new(probe, MonitorSettings::default());

    monitor.poll_once().await;
    assert_eq!(monitor.connection_state(), ConnectionState::Offline);

    monitor.poll_once().await;
    assert!(monitor.was_offline());

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert!(!monitor.was_offline());
    assert!(monitor.is_online());
}

#[tokio::test(start_paused = true)]
async fn test_polling_loop_follows_the_probe() {
    use ProbeOutcome::*;
    let probe = ScriptedProbe::new(&[Reachable, Unreachable, Unreachable, Reachable]);
    let monitor = NetworkMonitor::new(probe.clone(), MonitorSettings::default());
    let handle = monitor.start();

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(monitor.is_online());

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert!(!monitor.is_online());

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(probe.calls(), 4);
    assert_eq!(monitor.connection_state(), ConnectionState::Reconnecting);

    drop(handle);
    assert_eq!(monitor.connection_state(), ConnectionState::Online);
}

#[tokio::test]
async fn test_http_probe_against_server() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;

    let probe = HttpProbe::new(format!("{}/health", server.uri()), Duration::from_secs(3));
    let monitor = NetworkMonitor::new(Arc::new(probe), MonitorSettings::default());
    assert_eq!(monitor.poll_once().await, ProbeOutcome::Reachable);
    assert!(monitor.is_online());
}

#[tokio::test]
async fn test_http_probe_server_error_is_offline() {
    let server = MockServer::start().await;
    mount_health(&server, 503).await;

    let probe = HttpProbe::new(format!("{}/health", server.uri()), Duration::from_secs(3));
    let monitor = NetworkMonitor::new(Arc::new(probe), MonitorSettings::default());
    assert_eq!(monitor.poll_once().await, ProbeOutcome::Unreachable);
    assert!(!monitor.is_online());
}
