//! `jobboard-core`: domain records shared by the client cache and the search builder.
//!
//! This crate contains **pure domain** types (no I/O, no async).

pub mod application;
pub mod entity;
pub mod error;
pub mod id;
pub mod job;
pub mod value_object;

pub use application::{ApplicationRecord, ApplicationStatus, JobRef};
pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{ApplicationId, CompanyId, JobId, UserId};
pub use job::{CompanyRef, JobRecord, JobType};
pub use value_object::{SalaryRange, SortKey, ValueObject};
