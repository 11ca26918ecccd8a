/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Inspections
 * - `GET /api/inspections/pending` - Pending review list (paginated)
 * - `POST /api/inspections` - Submit a form
 * - `POST /api/inspections/{id}/review` - Mark reviewed (admin session)
 *
 * ## Admin
 * - `POST /api/admin/login` - Start an admin session
 * - `POST /api/admin/logout` - End it
 * - `GET /api/admin/inspections` - All submissions (admin session)
 */

use axum::{
    routing::{get, post},
    Router,
};
use crate::backend::auth::{login, logout};
use crate::backend::inspections::{create_inspection, list_all, list_pending, review_inspection};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Routes that take an `AdminToken` answer 401 without a live session;
/// the rest are public.
#[cfg(feature = "ssr")]
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Inspection endpoints
        .route("/api/inspections", post(create_inspection))
        .route("/api/inspections/pending", get(list_pending))
        .route("/api/inspections/{id}/review", post(review_inspection))
        // Admin endpoints
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/inspections", get(list_all))
}
