//! Job postings as delivered by the jobs endpoints.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::{CompanyId, JobId};
use crate::value_object::ValueObject;

/// Kind of engagement offered by a posting.
///
/// Parsing is case-insensitive and treats spaces/underscores as hyphens, so
/// `"Full Time"`, `"full_time"` and `"FULL-TIME"` are the same job type.
/// Values outside the known set are kept verbatim (normalized) in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Remote,
    Internship,
    Other(String),
}

impl JobType {
    pub fn as_str(&self) -> &str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
            JobType::Other(s) => s,
        }
    }

    /// Normalized form used for all comparisons.
    pub fn normalize(raw: &str) -> String {
        raw.trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect()
    }
}

impl FromStr for JobType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = Self::normalize(s);
        Ok(match normalized.as_str() {
            "" => return Err(DomainError::invalid_value("job type: empty")),
            "full-time" => JobType::FullTime,
            "part-time" => JobType::PartTime,
            "contract" => JobType::Contract,
            "remote" => JobType::Remote,
            "internship" => JobType::Internship,
            _ => JobType::Other(normalized),
        })
    }
}

impl TryFrom<String> for JobType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JobType> for String {
    fn from(value: JobType) -> Self {
        value.as_str().to_owned()
    }
}

impl core::fmt::Display for JobType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owning company, as populated into a job document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    #[serde(rename = "_id")]
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ValueObject for CompanyRef {}

/// A job posting snapshot.
///
/// Never edited locally: a later fetch replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(rename = "_id")]
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Required skills, in the order the employer listed them.
    #[serde(default, rename = "requirements")]
    pub skills: Vec<String>,
    pub salary: f64,
    #[serde(default)]
    pub location: String,
    pub job_type: JobType,
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub category: String,
    /// Number of open positions.
    #[serde(default, rename = "position")]
    pub positions: u32,
    #[serde(default)]
    pub company: Option<CompanyRef>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.name.as_str())
    }
}

impl Entity for JobRecord {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
