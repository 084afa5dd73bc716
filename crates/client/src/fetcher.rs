//! Remote collection fetcher.
//!
//! Every request resolves to `Ok(records)` or a [`FetchError`]; nothing
//! escapes this boundary as a panic or an untyped payload.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use jobboard_core::{ApplicationRecord, JobRecord};
use jobboard_search::SearchQuery;

use crate::config::Endpoints;
use crate::transport::{Transport, TransportResponse};
use crate::types::{CacheKey, Envelope, SearchResults};

/// Message shown for failures the user can only retry.
pub const RETRY_MESSAGE: &str = "Unable to reach the server. Please try again.";
/// Message shown when the session is missing or expired.
pub const SIGN_IN_MESSAGE: &str = "Please sign in to continue.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Unreachable, timed out, non-2xx (other than 401) or malformed body.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered 2xx with `success: false`.
    #[error("server declined: {0}")]
    ServerDeclined(String),
    /// HTTP 401: no valid session.
    #[error("authentication required: {0}")]
    AuthRequired(String),
}

impl FetchError {
    /// Text surfaced to the user for this failure.
    ///
    /// Declines carry the server's own message; everything else maps to a
    /// fixed text so repeated failures dedup to one notification.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::AuthRequired(_) => SIGN_IN_MESSAGE.to_string(),
            FetchError::ServerDeclined(message) if !message.trim().is_empty() => message.clone(),
            FetchError::ServerDeclined(_) | FetchError::Transport(_) => RETRY_MESSAGE.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct RemoteFetcher {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl RemoteFetcher {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Fetch the public jobs list, optionally narrowed server-side by `keyword`.
    pub async fn fetch_jobs(&self, keyword: Option<&str>) -> Result<Vec<JobRecord>, FetchError> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let query: Vec<(&str, &str)> = keyword.map(|k| ("keyword", k)).into_iter().collect();
        self.fetch_collection(CacheKey::Jobs, &query).await
    }

    /// Fetch the jobs posted by the signed-in recruiter.
    pub async fn fetch_admin_jobs(&self) -> Result<Vec<JobRecord>, FetchError> {
        self.fetch_collection(CacheKey::AdminJobs, &[]).await
    }

    /// Fetch the signed-in applicant's applications.
    pub async fn fetch_applied_jobs(&self) -> Result<Vec<ApplicationRecord>, FetchError> {
        self.fetch_collection(CacheKey::AppliedJobs, &[]).await
    }

    /// Delegate a structured search to the server.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, FetchError> {
        let body = serde_json::to_value(query)
            .map_err(|e| FetchError::Transport(format!("failed to encode search query: {e}")))?;

        let resp = self
            .transport
            .post_json(&self.endpoints.search, &body)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let mut envelope = decode_envelope(resp)?;
        let jobs: Vec<JobRecord> = take_records(&mut envelope, "jobs")?;
        let count = envelope
            .take("count")
            .and_then(|v| v.as_u64())
            .and_then(|c| usize::try_from(c).ok())
            .unwrap_or(jobs.len());

        Ok(SearchResults { jobs, count })
    }

    async fn fetch_collection<T>(
        &self,
        key: CacheKey,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let path = match key {
            CacheKey::Jobs => &self.endpoints.jobs,
            CacheKey::AdminJobs => &self.endpoints.admin_jobs,
            CacheKey::AppliedJobs => &self.endpoints.applied_jobs,
        };

        let resp = self
            .transport
            .get(path, query)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let mut envelope = decode_envelope(resp)?;
        take_records(&mut envelope, key.field())
    }
}

/// Classify a raw response and parse its envelope.
fn decode_envelope(resp: TransportResponse) -> Result<Envelope, FetchError> {
    if resp.status == 401 {
        let message = body_message(&resp.body).unwrap_or_else(|| "Unauthorized".to_string());
        return Err(FetchError::AuthRequired(message));
    }

    if !resp.is_success() {
        let detail = body_message(&resp.body)
            .map(|m| format!(": {m}"))
            .unwrap_or_default();
        return Err(FetchError::Transport(format!("HTTP {}{detail}", resp.status)));
    }

    let envelope: Envelope = serde_json::from_str(&resp.body)
        .map_err(|e| FetchError::Transport(format!("malformed response body: {e}")))?;

    if !envelope.success {
        return Err(FetchError::ServerDeclined(
            envelope.message.clone().unwrap_or_default(),
        ));
    }

    Ok(envelope)
}

/// Absent or `null` record fields are an empty (successful) result.
fn take_records<T: DeserializeOwned>(
    envelope: &mut Envelope,
    field: &str,
) -> Result<Vec<T>, FetchError> {
    match envelope.take(field) {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| FetchError::Transport(format!("malformed '{field}' field: {e}"))),
    }
}

fn body_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_owned)
}
