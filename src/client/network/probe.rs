//! Connectivity probes.

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        self == ProbeOutcome::Reachable
    }
}

/// One connectivity check. Implementations must not panic or error; any
/// failure is [`ProbeOutcome::Unreachable`].
#[async_trait]
pub trait ConnectivityProbe: Send + Sync + std::fmt::Debug {
    async fn probe(&self) -> ProbeOutcome;
}

/// HEAD request against the health endpoint.
///
/// Any response below 500 counts as reachable, including 404 or 401: the
/// server answered, so the network is up.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn probe(&self) -> ProbeOutcome {
        let result = self
            .client
            .head(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .timeout(self.timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().as_u16() < 500 => ProbeOutcome::Reachable,
            Ok(response) => {
                tracing::debug!("Health probe got {}", response.status());
                ProbeOutcome::Unreachable
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!("Health probe timed out after {:?}", self.timeout);
                ProbeOutcome::Unreachable
            }
            Err(e) => {
                tracing::debug!("Health probe failed: {}", e);
                ProbeOutcome::Unreachable
            }
        }
    }
}
