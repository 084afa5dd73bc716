//! Search criteria: the filter and ordering a `SearchQuery` maps to.

use serde_json::{Value, json};

use jobboard_core::{DomainResult, JobRecord, JobType, SortKey};

use crate::query::{SalaryBand, SearchQuery, constraint};

/// One conjunctive clause of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Case-insensitive substring of the title, the company name or any skill.
    Text(String),
    /// Case-insensitive substring of the location.
    Location(String),
    JobType(JobType),
    ExperienceLevel(String),
    Category(String),
    Salary(SalaryBand),
}

impl Criterion {
    pub fn matches(&self, job: &JobRecord) -> bool {
        match self {
            Criterion::Text(needle) => {
                contains_ci(&job.title, needle)
                    || job.company_name().is_some_and(|name| contains_ci(name, needle))
                    || job.skills.iter().any(|skill| contains_ci(skill, needle))
            }
            Criterion::Location(needle) => contains_ci(&job.location, needle),
            Criterion::JobType(job_type) => &job.job_type == job_type,
            Criterion::ExperienceLevel(level) => job.experience_level.trim() == level.as_str(),
            Criterion::Category(category) => job.category.trim() == category.as_str(),
            Criterion::Salary(band) => band.range().contains(job.salary),
        }
    }

    fn to_document(&self) -> Value {
        match self {
            Criterion::Text(needle) => {
                let pattern = regex_ci(needle);
                json!({ "$or": [
                    { "title": pattern },
                    { "company.name": pattern },
                    { "requirements": pattern },
                ]})
            }
            Criterion::Location(needle) => json!({ "location": regex_ci(needle) }),
            Criterion::JobType(job_type) => json!({ "jobType": job_type.as_str() }),
            Criterion::ExperienceLevel(level) => json!({ "experienceLevel": level }),
            Criterion::Category(category) => json!({ "category": category }),
            Criterion::Salary(band) => {
                let range = band.range();
                if range.is_unbounded_above() {
                    json!({ "salary": { "$gte": range.min() } })
                } else {
                    json!({ "salary": { "$gte": range.min(), "$lte": range.max() } })
                }
            }
        }
    }
}

/// Filter + ordering for a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub clauses: Vec<Criterion>,
    pub order: SortKey,
}

impl SearchCriteria {
    /// Build criteria from a query.
    ///
    /// Unconstrained fields produce no clause. Without `sortBy` results are
    /// ordered newest first.
    pub fn build(query: &SearchQuery) -> DomainResult<Self> {
        let mut clauses = Vec::new();

        if let Some(text) = constraint(&query.query) {
            clauses.push(Criterion::Text(text.to_lowercase()));
        }
        if let Some(location) = constraint(&query.location) {
            clauses.push(Criterion::Location(location.to_lowercase()));
        }
        if let Some(job_type) = constraint(&query.job_type) {
            clauses.push(Criterion::JobType(job_type.parse()?));
        }
        if let Some(level) = constraint(&query.experience_level) {
            clauses.push(Criterion::ExperienceLevel(level.to_owned()));
        }
        if let Some(category) = constraint(&query.category) {
            clauses.push(Criterion::Category(category.to_owned()));
        }
        if let Some(tag) = constraint(&query.salary_range) {
            clauses.push(Criterion::Salary(tag.parse()?));
        }

        let order = match constraint(&query.sort_by) {
            Some(key) => key.parse()?,
            None => SortKey::Latest,
        };

        tracing::debug!(clauses = clauses.len(), order = order.as_str(), "built search criteria");

        Ok(Self { clauses, order })
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(job))
    }

    /// Evaluate the criteria over an in-memory collection.
    pub fn apply(&self, jobs: &[JobRecord]) -> Vec<JobRecord> {
        let mut hits: Vec<JobRecord> = jobs.iter().filter(|j| self.matches(j)).cloned().collect();
        hits.sort_by(|a, b| self.order.compare(a, b));
        hits
    }

    /// Render as a document-store query: `{ "filter": ..., "sort": ... }`.
    pub fn to_document(&self) -> Value {
        let filter = match self.clauses.as_slice() {
            [] => json!({}),
            [only] => only.to_document(),
            many => json!({ "$and": many.iter().map(Criterion::to_document).collect::<Vec<_>>() }),
        };

        let sort = match self.order {
            SortKey::Latest => json!({ "createdAt": -1 }),
            SortKey::Oldest => json!({ "createdAt": 1 }),
            SortKey::SalaryHigh => json!({ "salary": -1 }),
            SortKey::SalaryLow => json!({ "salary": 1 }),
        };

        json!({ "filter": filter, "sort": sort })
    }
}

fn contains_ci(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

fn regex_ci(needle: &str) -> Value {
    json!({ "$regex": regex::escape(needle), "$options": "i" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use jobboard_core::{CompanyId, CompanyRef, JobId};
    use proptest::prelude::*;

    fn job(id: &str, title: &str, company: &str, salary: f64, job_type: JobType) -> JobRecord {
        JobRecord {
            id: JobId::new(id),
            title: title.to_string(),
            description: String::new(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            salary,
            location: "Berlin, DE".to_string(),
            job_type,
            experience_level: "2".to_string(),
            category: "engineering".to_string(),
            positions: 1,
            company: Some(CompanyRef {
                id: CompanyId::new(format!("c-{company}")),
                name: company.to_string(),
                logo: None,
                location: None,
            }),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_query_matches_everything_newest_first() {
        let criteria = SearchCriteria::build(&SearchQuery::default()).unwrap();
        assert!(criteria.clauses.is_empty());
        assert_eq!(criteria.order, SortKey::Latest);
        assert_eq!(
            criteria.to_document(),
            json!({ "filter": {}, "sort": { "createdAt": -1 } })
        );
    }

    #[test]
    fn text_matches_title_company_or_skills_case_insensitively() {
        let criteria = SearchCriteria::build(&SearchQuery::text("ACME")).unwrap();
        assert!(criteria.matches(&job("1", "Dev", "Acme Corp", 1.0, JobType::Remote)));
        assert!(!criteria.matches(&job("2", "Dev", "Initech", 1.0, JobType::Remote)));

        let by_skill = SearchCriteria::build(&SearchQuery::text("sql")).unwrap();
        assert!(by_skill.matches(&job("3", "Dev", "Initech", 1.0, JobType::Remote)));
    }

    #[test]
    fn exact_fields_and_salary_band_constrain() {
        let query = SearchQuery {
            job_type: Some("Full Time".into()),
            salary_range: Some("100k-200k".into()),
            category: Some("engineering".into()),
            experience_level: Some("2".into()),
            ..SearchQuery::default()
        };
        let criteria = SearchCriteria::build(&query).unwrap();

        assert!(criteria.matches(&job("1", "Backend", "Acme", 110_000.0, JobType::FullTime)));
        assert!(!criteria.matches(&job("2", "Backend", "Acme", 90_000.0, JobType::FullTime)));
        assert!(!criteria.matches(&job("3", "Backend", "Acme", 110_000.0, JobType::Contract)));
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let bad_band = SearchQuery {
            salary_range: Some("lots".into()),
            ..SearchQuery::default()
        };
        assert!(SearchCriteria::build(&bad_band).is_err());

        let bad_sort = SearchQuery {
            sort_by: Some("random".into()),
            ..SearchQuery::default()
        };
        assert!(SearchCriteria::build(&bad_sort).is_err());
    }

    #[test]
    fn document_escapes_regex_and_combines_clauses() {
        let query = SearchQuery {
            query: Some("c++".into()),
            salary_range: Some("200k+".into()),
            sort_by: Some("salary-low".into()),
            ..SearchQuery::default()
        };
        let doc = SearchCriteria::build(&query).unwrap().to_document();

        assert_eq!(doc["filter"]["$and"][0]["$or"][0]["title"]["$regex"], json!(r"c\+\+"));
        assert_eq!(doc["filter"]["$and"][0]["$or"][0]["title"]["$options"], json!("i"));
        assert_eq!(doc["filter"]["$and"][1], json!({ "salary": { "$gte": 200000.0 } }));
        assert_eq!(doc["sort"], json!({ "salary": 1 }));
    }

    #[test]
    fn latest_is_strictly_descending_creation_time() {
        let mut old = job("old", "A", "Acme", 1.0, JobType::Remote);
        let mut new = job("new", "B", "Acme", 1.0, JobType::Remote);
        old.created_at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        new.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let criteria = SearchCriteria::build(&SearchQuery::default()).unwrap();
        let ids: Vec<_> = criteria
            .apply(&[old, new])
            .into_iter()
            .map(|j| j.id.to_string())
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    proptest! {
        /// Every job returned by `apply` satisfies every clause, and no
        /// matching job is dropped.
        #[test]
        fn apply_returns_exactly_the_matching_jobs(
            salaries in prop::collection::vec(0u32..300_000u32, 0..20),
            band_idx in 0usize..4,
        ) {
            let jobs: Vec<JobRecord> = salaries
                .iter()
                .enumerate()
                .map(|(i, s)| job(&i.to_string(), "Dev", "Acme", f64::from(*s), JobType::FullTime))
                .collect();
            let query = SearchQuery {
                salary_range: Some(SalaryBand::ALL[band_idx].tag().to_string()),
                ..SearchQuery::default()
            };
            let criteria = SearchCriteria::build(&query).unwrap();
            let hits = criteria.apply(&jobs);

            prop_assert!(hits.iter().all(|j| criteria.matches(j)));
            prop_assert_eq!(hits.len(), jobs.iter().filter(|j| criteria.matches(j)).count());
        }
    }
}
