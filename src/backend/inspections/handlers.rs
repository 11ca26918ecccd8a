/**
 * Inspection Handlers
 *
 * - `GET /api/inspections/pending?page&limit` - pending review list
 * - `POST /api/inspections` - accept a tagged submission payload
 * - `POST /api/inspections/{id}/review` - mark reviewed (admin session)
 * - `GET /api/admin/inspections` - every submission (admin session)
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;
use crate::backend::error::BackendError;
use crate::backend::inspections::store::ReviewError;
use crate::backend::middleware::auth::AdminToken;
use crate::backend::server::state::AppState;
use crate::shared::pagination::{Page, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::shared::submission::{InspectionSummary, SubmissionPayload, SubmissionReceipt};

/// Raw query parameters. Parsed by hand so a bad value gets our JSON error
/// body instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PendingQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PendingQuery {
    fn parse(&self) -> Result<(u32, u32), BackendError> {
        let page = match self.page.as_deref() {
            None => 1,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| BackendError::bad_request("Invalid pagination parameters: page must be at least 1"))?,
        };
        let limit = match self.limit.as_deref() {
            None => DEFAULT_PAGE_LIMIT,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|limit| (1..=MAX_PAGE_LIMIT).contains(limit))
                .ok_or_else(|| {
                    BackendError::bad_request(format!(
                        "Invalid pagination parameters: limit must be between 1 and {}",
                        MAX_PAGE_LIMIT
                    ))
                })?,
        };
        Ok((page, limit))
    }
}

/// List inspections awaiting review
pub async fn list_pending(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<Page<InspectionSummary>>, BackendError> {
    let (page, limit) = query.parse()?;
    let result = state.inspections.read().await.pending(page, limit);
    tracing::debug!(
        "Pending inspections page {} ({} of {})",
        page,
        result.data.len(),
        result.pagination.total_count
    );
    Ok(Json(result))
}

/// Accept a submission
///
/// # Errors
///
/// * `400 Bad Request` - missing or unknown `type`, wrong shape, or a field
///   that fails validation
pub async fn create_inspection(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), BackendError> {
    let payload = SubmissionPayload::from_json(body).map_err(|e| {
        tracing::warn!("Rejected submission: {}", e);
        e
    })?;

    let now = state.clock.now();
    let receipt = state.inspections.write().await.insert(payload, now);
    tracing::info!("Accepted {} submission {}", receipt.form_type, receipt.id);
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Mark an inspection reviewed so it leaves the pending list
pub async fn review_inspection(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InspectionSummary>, BackendError> {
    let id = Uuid::parse_str(&id).map_err(|_| BackendError::not_found("Inspection not found"))?;
    let now = state.clock.now();
    let summary = state
        .inspections
        .write()
        .await
        .mark_reviewed(id, now)
        .map_err(|e| match e {
            ReviewError::NotFound => BackendError::not_found("Inspection not found"),
            ReviewError::NotAnInspection => {
                BackendError::bad_request("Only inspections can be reviewed")
            }
        })?;
    tracing::info!("Inspection {} reviewed", id);
    Ok(Json(summary))
}

/// Every stored submission, newest first
pub async fn list_all(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Json<Vec<InspectionSummary>> {
    Json(state.inspections.read().await.all())
}
