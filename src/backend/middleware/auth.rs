/**
 * Admin Authentication Extractor
 *
 * Protects admin routes. Reads the `Authorization: Bearer <token>` header and
 * checks the token against the live admin sessions. Any handler that takes an
 * `AdminToken` argument answers 401 without a valid session.
 */

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::backend::auth::sessions::SessionStore;
use crate::backend::error::BackendError;

/// Proof that the request carries a live admin session
#[derive(Clone, Debug)]
pub struct AdminToken(pub String);

/// Pull the bearer token out of request headers
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AdminToken
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::warn!("Missing admin session token");
            BackendError::unauthorized("No session token provided")
        })?;

        let sessions = SessionStore::from_ref(state);
        if !sessions.validate(token).await {
            tracing::warn!("Invalid or expired admin session token");
            return Err(BackendError::unauthorized("Invalid session token"));
        }

        Ok(AdminToken(token.to_string()))
    }
}
