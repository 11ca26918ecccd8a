/**
 * Router Configuration
 *
 * The main router creation function that combines all route configurations
 * into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check (probed by clients to decide whether they are online)
 * 2. API routes (inspections, admin)
 * 3. Fallback handler (404)
 */

use axum::{
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Liveness check
///
/// `GET` and `HEAD` both answer 200. Clients only look at the status code.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        })),
    )
}

/// Create the Axum router with all routes configured
#[cfg(feature = "ssr")]
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    // Add API routes
    let router = configure_api_routes(router);

    // Fallback handler for 404
    let router = router.fallback(|| async { BackendError::not_found("Not found") });

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
