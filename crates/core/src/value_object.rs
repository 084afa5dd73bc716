//! Value objects shared by the client pipeline and the server search builder.
//!
//! Both sides must agree on these semantics, so they live here rather than
//! being re-implemented in each crate.

use core::cmp::Ordering;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::job::JobRecord;

/// Marker trait for value objects: immutable, compared by value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Inclusive salary bounds `[min, max]`, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct SalaryRange {
    min: f64,
    max: f64,
}

impl SalaryRange {
    /// Range that accepts every non-negative salary.
    pub const ANY: SalaryRange = SalaryRange { min: 0.0, max: f64::MAX };

    pub fn new(min: f64, max: f64) -> DomainResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(DomainError::validation("salary bounds must be finite"));
        }
        if min > max {
            return Err(DomainError::validation(format!(
                "salary range min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Lower-bounded range with no upper limit.
    pub fn at_least(min: f64) -> DomainResult<Self> {
        Self::new(min, f64::MAX)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, salary: f64) -> bool {
        salary >= self.min && salary <= self.max
    }

    pub fn is_unbounded_above(&self) -> bool {
        self.max == f64::MAX
    }
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self::ANY
    }
}

impl TryFrom<(f64, f64)> for SalaryRange {
    type Error = DomainError;

    fn try_from((min, max): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<SalaryRange> for (f64, f64) {
    fn from(value: SalaryRange) -> Self {
        (value.min, value.max)
    }
}

impl ValueObject for SalaryRange {}

/// Ordering applied to a job listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Strictly descending creation timestamp.
    Latest,
    Oldest,
    SalaryHigh,
    SalaryLow,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Oldest => "oldest",
            SortKey::SalaryHigh => "salary-high",
            SortKey::SalaryLow => "salary-low",
        }
    }

    /// Comparator for `sort_by`; ties compare equal so a stable sort keeps
    /// the incoming order.
    pub fn compare(&self, a: &JobRecord, b: &JobRecord) -> Ordering {
        match self {
            SortKey::Latest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::SalaryHigh => b.salary.total_cmp(&a.salary),
            SortKey::SalaryLow => a.salary.total_cmp(&b.salary),
        }
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" | "newest" => Ok(SortKey::Latest),
            "oldest" => Ok(SortKey::Oldest),
            "salary-high" => Ok(SortKey::SalaryHigh),
            "salary-low" => Ok(SortKey::SalaryLow),
            other => Err(DomainError::invalid_value(format!("sort key '{other}'"))),
        }
    }
}

impl ValueObject for SortKey {}
