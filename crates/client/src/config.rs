//! Client configuration.
//!
//! Values come from `JOBBOARD_*` environment variables, falling back to
//! defaults suitable for a local development server.

use core::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::notifier::DEFAULT_SUPPRESSION_WINDOW;

/// How the jobs list reacts to the search keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobsMode {
    /// The keyword is sent to the server; changing it re-fetches the jobs entry.
    #[default]
    KeywordDelegated,
    /// The jobs entry is fetched unfiltered; the keyword only filters locally.
    FetchThenFilter,
}

impl FromStr for JobsMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword-delegated" => Ok(JobsMode::KeywordDelegated),
            "fetch-then-filter" => Ok(JobsMode::FetchThenFilter),
            other => anyhow::bail!(
                "unknown jobs mode '{other}' (expected keyword-delegated or fetch-then-filter)"
            ),
        }
    }
}

/// Request paths of the collection endpoints, relative to `api_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub jobs: String,
    pub admin_jobs: String,
    pub applied_jobs: String,
    pub search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            jobs: "/api/v1/job/get".to_string(),
            admin_jobs: "/api/v1/job/getadminjobs".to_string(),
            applied_jobs: "/api/v1/application/get".to_string(),
            search: "/api/v1/job/search".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub endpoints: Endpoints,
    /// How long an identical notification stays suppressed.
    pub notify_window: Duration,
    /// Upper bound on a single request, enforced by the transport.
    pub request_timeout: Duration,
    /// Initial visible count of a job list and the load-more step.
    pub page_size: usize,
    pub jobs_mode: JobsMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            endpoints: Endpoints::default(),
            notify_window: DEFAULT_SUPPRESSION_WINDOW,
            request_timeout: Duration::from_secs(15),
            page_size: 6,
            jobs_mode: JobsMode::default(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("JOBBOARD_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "JOBBOARD_NOTIFY_WINDOW_MS")? {
            config.notify_window = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "JOBBOARD_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<usize>(&lookup, "JOBBOARD_PAGE_SIZE")? {
            anyhow::ensure!(size > 0, "JOBBOARD_PAGE_SIZE must be at least 1");
            config.page_size = size;
        }
        if let Some(raw) = lookup("JOBBOARD_JOBS_MODE") {
            config.jobs_mode = raw.parse().context("invalid JOBBOARD_JOBS_MODE")?;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {name}: '{raw}'"))
        })
        .transpose()
}
