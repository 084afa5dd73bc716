//! Applications submitted by an applicant to a job.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::{ApplicationId, JobId, UserId};
use crate::job::JobRecord;

/// Review status of an application. Only ever changed server-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(DomainError::invalid_value(format!(
                "application status '{other}'"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` and absent both mean "not reviewed yet".
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(ApplicationStatus::Pending),
            Some(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Weak reference from an application to its job.
///
/// The applied-jobs endpoint usually populates the job document; other
/// endpoints only send the id. Either way the application does not own the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobRef {
    Id(JobId),
    Populated(Box<JobRecord>),
}

impl JobRef {
    pub fn job_id(&self) -> &JobId {
        match self {
            JobRef::Id(id) => id,
            JobRef::Populated(job) => &job.id,
        }
    }

    pub fn job(&self) -> Option<&JobRecord> {
        match self {
            JobRef::Id(_) => None,
            JobRef::Populated(job) => Some(job),
        }
    }
}

/// Latest fetched snapshot of one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(rename = "_id")]
    pub id: ApplicationId,
    pub job: JobRef,
    #[serde(default)]
    pub applicant: Option<UserId>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, rename = "createdAt")]
    pub applied_at: DateTime<Utc>,
}

impl Entity for ApplicationRecord {
    type Id = ApplicationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_defaults_to_pending_when_absent_or_null() {
        let absent: ApplicationRecord =
            serde_json::from_value(json!({ "_id": "a1", "job": "j1" })).unwrap();
        assert_eq!(absent.status, ApplicationStatus::Pending);

        let null: ApplicationRecord =
            serde_json::from_value(json!({ "_id": "a2", "job": "j1", "status": null })).unwrap();
        assert_eq!(null.status, ApplicationStatus::Pending);
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        let app: ApplicationRecord = serde_json::from_value(
            json!({ "_id": "a1", "job": "j1", "status": "Accepted" }),
        )
        .unwrap();
        assert_eq!(app.status, ApplicationStatus::Accepted);

        let err = serde_json::from_value::<ApplicationRecord>(
            json!({ "_id": "a1", "job": "j1", "status": "archived" }),
        );
        assert!(err.is_err());
    }

    #[test]
    fn job_reference_accepts_id_or_populated_document() {
        let by_id: ApplicationRecord =
            serde_json::from_value(json!({ "_id": "a1", "job": "j9" })).unwrap();
        assert_eq!(by_id.job.job_id().as_str(), "j9");
        assert!(by_id.job.job().is_none());

        let populated: ApplicationRecord = serde_json::from_value(json!({
            "_id": "a2",
            "job": { "_id": "j9", "title": "Backend Engineer", "salary": 1, "jobType": "remote" },
            "applicant": "u1",
            "createdAt": "2024-05-02T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(populated.job.job_id().as_str(), "j9");
        assert_eq!(populated.job.job().map(|j| j.title.as_str()), Some("Backend Engineer"));
        assert_eq!(populated.applicant, Some(UserId::new("u1")));
    }
}
