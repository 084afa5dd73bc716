//! Transport abstraction between the fetcher and the network.
//!
//! A transport only moves bytes: it reports the HTTP status and the raw body
//! and leaves envelope interpretation to [`crate::fetcher::RemoteFetcher`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;

/// Raw response of a completed request (any status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Issues requests carrying the caller's session credentials.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<TransportResponse, TransportError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport.
///
/// The cookie store is always enabled so session cookies set by the login
/// endpoint travel with every request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(config.api_url.clone(), client))
    }

    /// Use a preconfigured client (it must keep a cookie store).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn finish(
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<TransportResponse, TransportError> {
        let resp = result.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        Self::finish(self.client.get(&url).query(query).send().await).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        Self::finish(self.client.post(&url).json(body).send().await).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
