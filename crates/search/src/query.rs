//! Search request body posted to the search endpoint.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use jobboard_core::{DomainError, SalaryRange};

/// Structured job search.
///
/// Every field is optional; empty strings and `"all"` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    /// Salary band tag, see [`SalaryBand`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// Returns the trimmed value unless it is empty or the `"all"` wildcard.
pub(crate) fn constraint(value: &Option<String>) -> Option<&str> {
    let v = value.as_deref()?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(v)
    }
}

/// Closed set of salary bands a search can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalaryBand {
    UpTo50k,
    From50kTo100k,
    From100kTo200k,
    Above200k,
}

impl SalaryBand {
    pub const ALL: [SalaryBand; 4] = [
        SalaryBand::UpTo50k,
        SalaryBand::From50kTo100k,
        SalaryBand::From100kTo200k,
        SalaryBand::Above200k,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SalaryBand::UpTo50k => "0-50k",
            SalaryBand::From50kTo100k => "50k-100k",
            SalaryBand::From100kTo200k => "100k-200k",
            SalaryBand::Above200k => "200k+",
        }
    }

    /// Inclusive bounds of the band.
    pub fn range(&self) -> SalaryRange {
        let (min, max) = match self {
            SalaryBand::UpTo50k => (0.0, 50_000.0),
            SalaryBand::From50kTo100k => (50_000.0, 100_000.0),
            SalaryBand::From100kTo200k => (100_000.0, 200_000.0),
            SalaryBand::Above200k => (200_000.0, f64::MAX),
        };
        // Constant bounds, always ordered.
        SalaryRange::new(min, max).unwrap_or(SalaryRange::ANY)
    }
}

impl FromStr for SalaryBand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        SalaryBand::ALL
            .into_iter()
            .find(|band| band.tag() == tag)
            .ok_or_else(|| DomainError::invalid_value(format!("salary range '{s}'")))
    }
}
