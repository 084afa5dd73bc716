//! Client-side synchronization layer for the job board.
//!
//! The pieces, bottom-up:
//! - [`notifier`]: deduplicates user-facing messages inside a time window.
//! - [`transport`] / [`fetcher`]: HTTP boundary and envelope decoding.
//! - [`store`]: process-wide snapshot cache with whole-collection replacement.
//! - [`policy`]: decides when to fetch and applies only the latest response.
//! - [`filter`]: pure client-side filtering, sorting and pagination.
//!
//! The server-side counterpart of the filter lives in `jobboard-search`.

pub mod config;
pub mod fetcher;
pub mod filter;
pub mod notifier;
pub mod policy;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, Endpoints, JobsMode};
pub use fetcher::{FetchError, RemoteFetcher};
pub use filter::{JobFilter, JobListView, JobTypeFilter, Page};
pub use notifier::{NotificationSink, Notifier, TracingSink};
pub use policy::{ConsumerId, ConsumerKind, ConsumerState, FetchOutcome, SyncPolicy, Trigger};
pub use store::CacheStore;
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use types::{CacheKey, SearchResults};
