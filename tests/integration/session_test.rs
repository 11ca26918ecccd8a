//! Full client flow: edit offline, reconnect, submit

use crate::common::{config_for, mount_pending_count, mount_submission_ok, room_inspection};
use custodial_sync::client::autosave::{AutoSaveController, SaveStatus};
use custodial_sync::client::drafts::{DraftKey, DraftStore};
use custodial_sync::client::network::{ConnectivityEvent, MonitorSettings, NetworkMonitor};
use custodial_sync::client::offline::{OfflineSync, SubmissionQueue};
use custodial_sync::client::session::{FormSession, SubmitOutcome};
use custodial_sync::client::storage::MemoryStorage;
use custodial_sync::client::{InspectionApi, PendingCountPoller};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

use crate::common::ScriptedProbe;

#[tokio::test]
async fn test_offline_edit_then_online_submit() {
    let server = MockServer::start().await;
    mount_submission_ok(&server).await;
    mount_pending_count(&server, 1).await;

    let config = config_for(&server.uri());
    let storage = Arc::new(MemoryStorage::new());
    let session = FormSession::new(
        DraftKey::Inspection.as_str(),
        DraftStore::new(storage),
        AutoSaveController::new(Duration::from_millis(20)),
        NetworkMonitor::new(ScriptedProbe::new(&[]), MonitorSettings::default()),
        InspectionApi::new(config.clone()),
        PendingCountPoller::from_config(&config),
    );

    session.monitor().handle_event(ConnectivityEvent::Offline);
    session.record_edit(json!({ "school": "ASA", "floors": 4 }));
    session.record_edit(json!({ "school": "ASA", "floors": 5 }));
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(session.autosave().status(), SaveStatus::Saved);

    let payload = room_inspection("ASA");
    assert_eq!(session.submit(&payload).await.unwrap(), SubmitOutcome::Deferred);
    assert_eq!(
        session.restore::<Value>().await,
        Some(json!({ "school": "ASA", "floors": 5 }))
    );

    session.monitor().handle_event(ConnectivityEvent::Online);
    assert!(session.monitor().was_offline());

    let outcome = session.submit(&payload).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert_eq!(session.restore::<Value>().await, None);
}

#[tokio::test]
async fn test_offline_submission_is_sent_on_reconnect() {
    let server = MockServer::start().await;
    mount_submission_ok(&server).await;
    mount_pending_count(&server, 3).await;

    let config = config_for(&server.uri());
    let store = DraftStore::new(Arc::new(MemoryStorage::new()));
    let queue = SubmissionQueue::new(store.clone());
    let monitor = NetworkMonitor::new(ScriptedProbe::new(&[]), MonitorSettings::default());
    let poller = PendingCountPoller::from_config(&config);
    let session = FormSession::new(
        DraftKey::Inspection.as_str(),
        store,
        AutoSaveController::new(Duration::from_millis(20)),
        monitor.clone(),
        InspectionApi::new(config.clone()),
        poller.clone(),
    )
    .with_queue(queue.clone());
    let sync = OfflineSync::new(
        queue.clone(),
        InspectionApi::new(config.clone()),
        monitor.clone(),
        poller.clone(),
        Duration::from_secs(3600),
    );
    let _worker = sync.start();

    monitor.handle_event(ConnectivityEvent::Offline);
    session.record_edit(json!({ "school": "ASA" }));
    tokio::time::sleep(Duration::from_millis(150)).await;

    let payload = room_inspection("ASA");
    assert_eq!(session.submit(&payload).await.unwrap(), SubmitOutcome::Deferred);
    assert_eq!(queue.len().await, 1);
    assert!(server.received_requests().await.unwrap().is_empty());

    monitor.handle_event(ConnectivityEvent::Online);
    for _ in 0..100 {
        if queue.is_empty().await && poller.pending_count().await == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(queue.is_empty().await);
    assert_eq!(session.restore::<Value>().await, None);
    assert_eq!(poller.pending_count().await, 3);
    let posts = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 1);
}
