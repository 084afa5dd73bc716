//! Fetch-trigger policy.
//!
//! Consumers (a jobs list, the recruiter's jobs list, the applicant's
//! applications list) register interest in one cache entry. Every trigger
//! (mount, keyword change, forced refresh, retry) is evaluated by [`decide`];
//! fetches that go ahead are sequenced per entry so only the response to the
//! most recently *issued* request is ever applied.
//!
//! State per consumer: `Idle -> Fetching -> {Populated | Failed}`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jobboard_core::{ApplicationRecord, JobRecord};

use crate::config::{ClientConfig, JobsMode};
use crate::fetcher::{FetchError, RemoteFetcher};
use crate::notifier::{NotificationSink, Notifier, TracingSink};
use crate::store::CacheStore;
use crate::transport::Transport;
use crate::types::CacheKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerKind {
    Jobs,
    AdminJobs,
    /// With `force_refresh: false` a populated entry is served without a fetch.
    AppliedJobs { force_refresh: bool },
}

impl ConsumerKind {
    pub fn cache_key(&self) -> CacheKey {
        match self {
            ConsumerKind::Jobs => CacheKey::Jobs,
            ConsumerKind::AdminJobs => CacheKey::AdminJobs,
            ConsumerKind::AppliedJobs { .. } => CacheKey::AppliedJobs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Idle,
    Fetching,
    Populated,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Mount,
    KeywordChanged,
    ForcedRefresh,
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Applied jobs already cached and no forced refresh.
    ServedFromCache,
    /// Keyword filters locally in fetch-then-filter mode.
    LocalFilter,
    /// Retry requested but the consumer has not failed.
    NotFailed,
    /// The trigger does not concern this consumer.
    NotApplicable,
    Unmounted,
    KeywordUnchanged,
    NoConsumer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fetch,
    Skip(SkipReason),
}

/// Whether `trigger` requires a network fetch for a consumer of `kind`.
pub fn decide(
    kind: ConsumerKind,
    trigger: Trigger,
    state: ConsumerState,
    mode: JobsMode,
    entry_populated: bool,
) -> Decision {
    match (trigger, kind) {
        (Trigger::ForcedRefresh, _) => Decision::Fetch,
        (Trigger::Retry, _) if state == ConsumerState::Failed => Decision::Fetch,
        (Trigger::Retry, _) => Decision::Skip(SkipReason::NotFailed),
        (Trigger::Mount, ConsumerKind::AppliedJobs { force_refresh: false }) if entry_populated => {
            Decision::Skip(SkipReason::ServedFromCache)
        }
        (Trigger::Mount, _) => Decision::Fetch,
        (Trigger::KeywordChanged, ConsumerKind::Jobs) => match mode {
            JobsMode::KeywordDelegated => Decision::Fetch,
            JobsMode::FetchThenFilter => Decision::Skip(SkipReason::LocalFilter),
        },
        (Trigger::KeywordChanged, _) => Decision::Skip(SkipReason::NotApplicable),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Skipped(SkipReason),
    /// The response was written to the store.
    Applied { records: usize },
    /// A newer request for the same entry was issued before this one resolved.
    Superseded,
    /// Every consumer of the entry unmounted while the request was in flight.
    Unobserved,
    Failed(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u64);

#[derive(Debug, Clone, Copy)]
struct Ticket {
    key: CacheKey,
    seq: u64,
}

/// Monotonic per-entry request numbering.
#[derive(Debug, Default)]
struct FetchSequencer {
    issued: Mutex<HashMap<CacheKey, u64>>,
}

impl FetchSequencer {
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, u64>> {
        self.issued.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(&self, key: CacheKey) -> Ticket {
        let mut issued = self.lock();
        let seq = issued.entry(key).or_insert(0);
        *seq += 1;
        Ticket { key, seq: *seq }
    }

    fn is_latest(&self, ticket: &Ticket) -> bool {
        self.lock().get(&ticket.key) == Some(&ticket.seq)
    }

    /// Make every in-flight request stale.
    fn invalidate_all(&self) {
        let mut issued = self.lock();
        for key in CacheKey::ALL {
            *issued.entry(key).or_insert(0) += 1;
        }
    }
}

enum Fetched {
    Jobs(Vec<JobRecord>),
    AdminJobs(Vec<JobRecord>),
    AppliedJobs(Vec<ApplicationRecord>),
}

impl Fetched {
    fn len(&self) -> usize {
        match self {
            Fetched::Jobs(v) | Fetched::AdminJobs(v) => v.len(),
            Fetched::AppliedJobs(v) => v.len(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    kind: ConsumerKind,
    state: ConsumerState,
}

/// Decides when to fetch and owns the only write path into the store.
pub struct SyncPolicy {
    store: Arc<CacheStore>,
    notifier: Arc<Notifier>,
    sink: Arc<dyn NotificationSink>,
    fetcher: RemoteFetcher,
    mode: JobsMode,
    consumers: Mutex<HashMap<ConsumerId, Slot>>,
    next_id: AtomicU64,
    sequencer: FetchSequencer,
}

impl SyncPolicy {
    pub fn new(
        store: Arc<CacheStore>,
        notifier: Arc<Notifier>,
        sink: Arc<dyn NotificationSink>,
        fetcher: RemoteFetcher,
        mode: JobsMode,
    ) -> Self {
        Self {
            store,
            notifier,
            sink,
            fetcher,
            mode,
            consumers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            sequencer: FetchSequencer::default(),
        }
    }

    /// Fresh store and notifier; notifications go to the log.
    pub fn from_config(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(
            Arc::new(CacheStore::new()),
            Arc::new(Notifier::new(config.notify_window)),
            Arc::new(TracingSink),
            RemoteFetcher::new(transport, config.endpoints.clone()),
            config.jobs_mode,
        )
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    pub fn mode(&self) -> JobsMode {
        self.mode
    }

    /// Register a consumer in `Idle` without fetching.
    pub fn register(&self, kind: ConsumerKind) -> ConsumerId {
        let id = ConsumerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_consumers().insert(
            id,
            Slot {
                kind,
                state: ConsumerState::Idle,
            },
        );
        id
    }

    /// Register a consumer and evaluate its mount trigger.
    pub async fn mount(&self, kind: ConsumerKind) -> (ConsumerId, FetchOutcome) {
        let id = self.register(kind);
        let outcome = self.trigger(id, Trigger::Mount).await;
        (id, outcome)
    }

    /// Drop a consumer. Responses for entries nobody observes are discarded.
    pub fn unmount(&self, id: ConsumerId) -> bool {
        self.lock_consumers().remove(&id).is_some()
    }

    pub fn state(&self, id: ConsumerId) -> Option<ConsumerState> {
        self.lock_consumers().get(&id).map(|s| s.state)
    }

    pub async fn trigger(&self, id: ConsumerId, trigger: Trigger) -> FetchOutcome {
        let Some((kind, state)) = self.lock_consumers().get(&id).map(|s| (s.kind, s.state)) else {
            return FetchOutcome::Skipped(SkipReason::Unmounted);
        };
        let key = kind.cache_key();

        match decide(kind, trigger, state, self.mode, self.store.is_populated(key)) {
            Decision::Fetch => self.fetch_entry(key).await,
            Decision::Skip(reason) => {
                if reason == SkipReason::ServedFromCache {
                    if let Some(slot) = self.lock_consumers().get_mut(&id) {
                        slot.state = ConsumerState::Populated;
                    }
                }
                tracing::debug!(entry = %key, ?trigger, ?reason, "fetch skipped");
                FetchOutcome::Skipped(reason)
            }
        }
    }

    pub async fn refresh(&self, id: ConsumerId) -> FetchOutcome {
        self.trigger(id, Trigger::ForcedRefresh).await
    }

    pub async fn retry(&self, id: ConsumerId) -> FetchOutcome {
        self.trigger(id, Trigger::Retry).await
    }

    /// Bind a new search keyword and re-evaluate the jobs consumers.
    pub async fn set_search_keyword(&self, keyword: &str) -> FetchOutcome {
        if !self.store.set_search_keyword(keyword) {
            return FetchOutcome::Skipped(SkipReason::KeywordUnchanged);
        }

        let jobs_consumer = self
            .lock_consumers()
            .values()
            .find(|s| s.kind == ConsumerKind::Jobs)
            .map(|s| s.state);
        let Some(state) = jobs_consumer else {
            return FetchOutcome::Skipped(SkipReason::NoConsumer);
        };

        let populated = self.store.is_populated(CacheKey::Jobs);
        match decide(ConsumerKind::Jobs, Trigger::KeywordChanged, state, self.mode, populated) {
            Decision::Fetch => self.fetch_entry(CacheKey::Jobs).await,
            Decision::Skip(reason) => FetchOutcome::Skipped(reason),
        }
    }

    /// End the session: stale every in-flight request, clear the cache and
    /// the notifier, and return consumers to `Idle`.
    ///
    /// Runs under the consumers lock, the same lock `settle` holds from its
    /// sequence check to its store write.
    pub fn logout(&self) {
        let mut consumers = self.lock_consumers();
        self.sequencer.invalidate_all();
        self.store.clear();
        self.notifier.reset();
        for slot in consumers.values_mut() {
            slot.state = ConsumerState::Idle;
        }
        tracing::info!("session cleared");
    }

    async fn fetch_entry(&self, key: CacheKey) -> FetchOutcome {
        let ticket = self.sequencer.issue(key);
        for slot in self.lock_consumers().values_mut() {
            if slot.kind.cache_key() == key {
                slot.state = ConsumerState::Fetching;
            }
        }
        tracing::debug!(entry = %key, seq = ticket.seq, "fetch issued");

        let result = match key {
            CacheKey::Jobs => {
                let keyword = match self.mode {
                    JobsMode::KeywordDelegated => Some(self.store.search_keyword()),
                    JobsMode::FetchThenFilter => None,
                };
                self.fetcher
                    .fetch_jobs(keyword.as_deref())
                    .await
                    .map(Fetched::Jobs)
            }
            CacheKey::AdminJobs => self.fetcher.fetch_admin_jobs().await.map(Fetched::AdminJobs),
            CacheKey::AppliedJobs => self
                .fetcher
                .fetch_applied_jobs()
                .await
                .map(Fetched::AppliedJobs),
        };

        let outcome = self.settle(ticket, result);
        if let FetchOutcome::Failed(err) = &outcome {
            self.report(err);
        }
        outcome
    }

    /// Apply or discard a resolved request.
    fn settle(&self, ticket: Ticket, result: Result<Fetched, FetchError>) -> FetchOutcome {
        let mut consumers = self.lock_consumers();

        if !self.sequencer.is_latest(&ticket) {
            tracing::debug!(entry = %ticket.key, seq = ticket.seq, "superseded response discarded");
            return FetchOutcome::Superseded;
        }
        if !consumers.values().any(|s| s.kind.cache_key() == ticket.key) {
            tracing::debug!(entry = %ticket.key, seq = ticket.seq, "response for unmounted consumers discarded");
            return FetchOutcome::Unobserved;
        }

        let (next, outcome) = match result {
            Ok(fetched) => {
                let records = fetched.len();
                match fetched {
                    Fetched::Jobs(jobs) => self.store.set_jobs(jobs),
                    Fetched::AdminJobs(jobs) => self.store.set_admin_jobs(jobs),
                    Fetched::AppliedJobs(apps) => self.store.set_applied_jobs(apps),
                }
                tracing::debug!(entry = %ticket.key, records, "cache entry replaced");
                (ConsumerState::Populated, FetchOutcome::Applied { records })
            }
            Err(err) => {
                tracing::warn!(entry = %ticket.key, error = %err, "fetch failed; keeping cached entry");
                (ConsumerState::Failed, FetchOutcome::Failed(err))
            }
        };

        for slot in consumers.values_mut() {
            if slot.kind.cache_key() == ticket.key && slot.state == ConsumerState::Fetching {
                slot.state = next;
            }
        }
        outcome
    }

    fn report(&self, err: &FetchError) {
        let message = err.user_message();
        self.notifier
            .notify_once(&message, |m| self.sink.deliver(m));
    }

    fn lock_consumers(&self) -> MutexGuard<'_, HashMap<ConsumerId, Slot>> {
        self.consumers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
