//! Synchronized cache store.
//!
//! Holds the last known-good snapshot of each server collection plus the
//! search keyword bound to the jobs entry. Every mutation replaces a whole
//! entry; there is no way to patch part of a collection.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use jobboard_core::{ApplicationRecord, JobId, JobRecord, find_by_id};

use crate::types::CacheKey;

#[derive(Debug, Default)]
struct CacheState {
    jobs: Arc<Vec<JobRecord>>,
    admin_jobs: Arc<Vec<JobRecord>>,
    applied_jobs: Arc<Vec<ApplicationRecord>>,
    search_keyword: String,
}

/// Process-wide cache shared by every consumer.
///
/// Readers get `Arc` snapshots, so a reader never observes a collection
/// while it is being replaced.
#[derive(Debug)]
pub struct CacheStore {
    state: RwLock<CacheState>,
    revision: watch::Sender<u64>,
}

impl CacheStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(CacheState::default()),
            revision,
        }
    }

    pub fn jobs(&self) -> Arc<Vec<JobRecord>> {
        self.read(|s| s.jobs.clone())
    }

    pub fn admin_jobs(&self) -> Arc<Vec<JobRecord>> {
        self.read(|s| s.admin_jobs.clone())
    }

    pub fn applied_jobs(&self) -> Arc<Vec<ApplicationRecord>> {
        self.read(|s| s.applied_jobs.clone())
    }

    pub fn search_keyword(&self) -> String {
        self.read(|s| s.search_keyword.clone())
    }

    /// An empty entry means "never fetched successfully, or cleared".
    pub fn is_populated(&self, key: CacheKey) -> bool {
        self.read(|s| match key {
            CacheKey::Jobs => !s.jobs.is_empty(),
            CacheKey::AdminJobs => !s.admin_jobs.is_empty(),
            CacheKey::AppliedJobs => !s.applied_jobs.is_empty(),
        })
    }

    pub fn set_jobs(&self, jobs: Vec<JobRecord>) {
        self.write(|s| s.jobs = Arc::new(jobs));
    }

    pub fn set_admin_jobs(&self, jobs: Vec<JobRecord>) {
        self.write(|s| s.admin_jobs = Arc::new(jobs));
    }

    pub fn set_applied_jobs(&self, applications: Vec<ApplicationRecord>) {
        self.write(|s| s.applied_jobs = Arc::new(applications));
    }

    /// Bind a new search keyword; returns whether it changed.
    pub fn set_search_keyword(&self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        if self.read(|s| s.search_keyword == keyword) {
            return false;
        }
        self.write(|s| s.search_keyword = keyword);
        true
    }

    /// Drop every entry and the keyword (session end).
    pub fn clear(&self) {
        self.write(|s| *s = CacheState::default());
    }

    /// Look up a cached job by id.
    pub fn job(&self, id: &JobId) -> Option<JobRecord> {
        self.read(|s| find_by_id(s.jobs.as_slice(), id).cloned())
    }

    /// Whether the cached applications reference `job_id`.
    pub fn has_applied(&self, job_id: &JobId) -> bool {
        self.read(|s| s.applied_jobs.iter().any(|a| a.job.job_id() == job_id))
    }

    /// Revision counter bumped after every mutation.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn read<R>(&self, f: impl FnOnce(&CacheState) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut CacheState)) {
        {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard);
        }
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
