//! `jobboard-search`
//!
//! **Responsibility:** translate a structured job search into a document-store
//! filter and ordering.
//!
//! The query runs server-side; this crate owns the request body contract
//! (`SearchQuery`) and the criteria it maps to (`SearchCriteria`). The
//! criteria can also be evaluated in memory, which is how the client checks
//! that its local filtering agrees with what the server would return.

pub mod criteria;
pub mod query;

pub use criteria::{Criterion, SearchCriteria};
pub use query::{SalaryBand, SearchQuery};
