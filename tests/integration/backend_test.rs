//! Router tests driven through `tower::ServiceExt::oneshot`

use crate::common::{building_inspection, custodial_note, room_inspection};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use custodial_sync::backend::{create_app_with_state, AppState, ServerConfig};
use custodial_sync::shared::clock::ManualClock;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "correct-horse";

fn app_with_clock() -> (Router, ManualClock) {
    let clock = ManualClock::starting_now();
    let config = ServerConfig::default().with_admin_password(PASSWORD);
    let state = AppState::with_clock(&config, Arc::new(clock.clone()));
    (create_app_with_state(state), clock)
}

fn app() -> Router {
    app_with_clock().0
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn submit(app: &Router, payload: Value) -> (StatusCode, Value) {
    send(app, json_request(Method::POST, "/api/inspections", &payload, None)).await
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(Method::POST, "/api/admin/login", &json!({ "password": PASSWORD }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["sessionToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_get_and_head() {
    let app = app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let head = Request::builder()
        .method(Method::HEAD)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(head).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_submission_counts_as_pending() {
    let app = app();
    let (status, receipt) = submit(&app, serde_json::to_value(room_inspection("ASA")).unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["type"], "single_room");

    submit(&app, serde_json::to_value(building_inspection("ASA")).unwrap()).await;
    submit(&app, serde_json::to_value(custodial_note("ASA")).unwrap()).await;

    let (status, body) = send(&app, get("/api/inspections/pending?limit=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalCount"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submission_validation() {
    let app = app();

    let (status, body) = submit(&app, json!({ "school": "ASA" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = submit(&app, json!({ "type": "survey", "school": "ASA" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("survey"));

    let mut payload = serde_json::to_value(room_inspection("ASA")).unwrap();
    payload["floors"] = json!(9);
    let (status, body) = submit(&app, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("floors"));
}

#[tokio::test]
async fn test_pending_pagination_bounds() {
    let app = app();
    for uri in [
        "/api/inspections/pending?limit=0",
        "/api/inspections/pending?limit=101",
        "/api/inspections/pending?page=0",
        "/api/inspections/pending?limit=abc",
    ] {
        let (status, _) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }

    let (status, body) = send(&app, get("/api/inspections/pending")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["limit"], 50);
    assert_eq!(body["pagination"]["totalCount"], 0);
}

#[tokio::test]
async fn test_admin_login() {
    let app = app();
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/admin/login", &json!({ "password": "nope" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/admin/login", &json!({}), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token = login(&app).await;
    assert!(token.starts_with("admin_"));
}

#[tokio::test]
async fn test_login_disabled_without_password() {
    let app = create_app_with_state(AppState::new(&ServerConfig::default()));
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/admin/login", &json!({ "password": "x" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_review_flow() {
    let app = app();
    let (_, receipt) = submit(&app, serde_json::to_value(room_inspection("ASA")).unwrap()).await;
    let id = receipt["id"].as_str().unwrap().to_string();
    let review_uri = format!("/api/inspections/{}/review", id);

    let (status, _) = send(&app, json_request(Method::POST, &review_uri, &json!({}), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/inspections/00000000-0000-0000-0000-000000000000/review",
            &json!({}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(Method::POST, &review_uri, &json!({}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reviewedAt"].is_string());

    let (_, pending) = send(&app, get("/api/inspections/pending")).await;
    assert_eq!(pending["pagination"]["totalCount"], 0);
}

#[tokio::test]
async fn test_session_expiry_and_logout() {
    let (app, clock) = app_with_clock();
    let token = login(&app).await;

    let list = |token: &str| {
        Request::builder()
            .uri("/api/admin/inspections")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(&app, list(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/admin/logout", &json!({}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (status, _) = send(&app, list(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    clock.advance(chrono::Duration::hours(9));
    let (status, _) = send(&app, list(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, body) = send(&app(), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}
