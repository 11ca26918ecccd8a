//! Mock server helpers for integration tests
//!
//! Thin wrappers over `wiremock` for the endpoints the client talks to.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answer `GET /api/inspections/pending` with `count`
pub async fn mount_pending_count(server: &MockServer, count: u64) {
    Mock::given(method("GET"))
        .and(path("/api/inspections/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "pagination": {
                "page": 1,
                "limit": 1,
                "total": count,
                "totalCount": count,
                "totalPages": count
            }
        })))
        .mount(server)
        .await;
}

/// Answer `HEAD /health` with `status`
pub async fn mount_health(server: &MockServer, status: u16) {
    Mock::given(method("HEAD"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Accept every submission with a fixed receipt
pub async fn mount_submission_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/inspections"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "9a3e1c55-7d2b-4f60-8e14-2b7c9d0a6f31",
            "type": "single_room",
            "createdAt": "2025-03-01T12:00:00Z"
        })))
        .mount(server)
        .await;
}
