//! Inspection API Client
//!
//! Async wrapper over the inspection endpoints. Errors are typed so callers
//! can tell "the server said no" apart from "we never reached the server".

use crate::client::config::Config;
use crate::shared::error::SharedError;
use crate::shared::pagination::PaginationEnvelope;
use crate::shared::submission::{SubmissionPayload, SubmissionReceipt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const PENDING_COUNT_PATH: &str = "/api/inspections/pending?limit=1";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// The response body was not what we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The payload was rejected before sending, or by the server with 400
    #[error(transparent)]
    Validation(#[from] SharedError),
}

impl ApiError {
    /// True when the server could not be reached at all or failed on its
    /// side, so retrying later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) | Self::Validation(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Error body rendered by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct InspectionApi {
    config: Config,
    client: Client,
}

impl InspectionApi {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn error_for(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        if status == StatusCode::BAD_REQUEST {
            return ApiError::Validation(SharedError::validation("payload", message));
        }
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// Submit a form. The payload is validated locally first.
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, ApiError> {
        payload.validate()?;

        let url = self.config.api_url("/api/inspections");
        tracing::debug!("Submitting {} for {}", payload.form_type(), payload.school());

        let response = self
            .client
            .post(&url)
            .timeout(self.config.request_timeout)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let receipt = response.json::<SubmissionReceipt>().await?;
        tracing::info!("Submitted {} as {}", receipt.form_type, receipt.id);
        Ok(receipt)
    }

    /// Number of inspections awaiting review, read from
    /// `pagination.totalCount` (absent counts read as 0)
    pub async fn pending_count(&self) -> Result<u64, ApiError> {
        let url = self.config.api_url(PENDING_COUNT_PATH);
        let response = self
            .client
            .get(&url)
            .timeout(self.config.request_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        let envelope = response.json::<PaginationEnvelope>().await?;
        Ok(envelope.total_count())
    }
}
