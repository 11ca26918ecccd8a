//! Pending count poller against a mock server

use crate::common::{config_for, mount_pending_count};
use custodial_sync::client::{InspectionApi, PendingCountPoller};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_poller_from_config() {
    let server = MockServer::start().await;
    mount_pending_count(&server, 17).await;

    let poller = PendingCountPoller::from_config(&config_for(&server.uri()));
    assert_eq!(poller.refresh().await, 17);
}

#[tokio::test]
async fn test_outage_keeps_last_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inspections/pending"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "pagination": { "totalCount": 6 } })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let poller = PendingCountPoller::new(
        InspectionApi::new(config_for(&server.uri())),
        Duration::from_secs(300),
    );
    assert_eq!(poller.refresh().await, 6);

    // Server goes away entirely
    drop(server);
    assert_eq!(poller.refresh().await, 6);
}
