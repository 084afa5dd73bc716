//! Shared wire and cache types.
//!
//! These types must not depend on the transport implementation; they describe
//! the server's response envelopes and the names of the cached collections.

use serde::Deserialize;
use serde_json::{Map, Value};

use jobboard_core::JobRecord;

/// A cached server collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Jobs,
    AdminJobs,
    AppliedJobs,
}

impl CacheKey {
    pub const ALL: [CacheKey; 3] = [CacheKey::Jobs, CacheKey::AdminJobs, CacheKey::AppliedJobs];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Jobs => "jobs",
            CacheKey::AdminJobs => "admin_jobs",
            CacheKey::AppliedJobs => "applied_jobs",
        }
    }

    /// Envelope field carrying the records.
    ///
    /// The applied-jobs endpoint uses the singular `application`; the server
    /// handler writes the same name.
    pub fn field(&self) -> &'static str {
        match self {
            CacheKey::Jobs | CacheKey::AdminJobs => "jobs",
            CacheKey::AppliedJobs => "application",
        }
    }
}

impl core::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ success, message?, <payload fields> }` as returned by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// Take a payload field, treating absent and `null` as missing.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        match self.fields.remove(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }
}

/// Result of a delegated search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub jobs: Vec<JobRecord>,
    /// Total reported by the server; falls back to `jobs.len()`.
    pub count: usize,
}
