//! The client pipeline and the server criteria builder must select the same
//! jobs for the same constraints.

use chrono::{TimeZone, Utc};
use jobboard_client::{JobFilter, JobTypeFilter};
use jobboard_core::{CompanyId, CompanyRef, JobId, JobRecord, JobType, SortKey};
use jobboard_search::{SalaryBand, SearchCriteria, SearchQuery};
use proptest::prelude::*;

const TYPES: [JobType; 5] = [
    JobType::FullTime,
    JobType::PartTime,
    JobType::Contract,
    JobType::Remote,
    JobType::Internship,
];

fn arb_job() -> impl Strategy<Value = JobRecord> {
    (
        "[a-cA-C ]{0,8}",
        proptest::option::of("[a-c]{1,4}"),
        0u32..300_000,
        0usize..TYPES.len(),
        0i64..5,
    )
        .prop_map(|(title, company, salary, ty, day)| JobRecord {
            id: JobId::new(format!("{title}-{salary}-{day}")),
            title,
            description: String::new(),
            // Skill-only matches are covered by skill_only_match_is_server_side_only.
            skills: Vec::new(),
            salary: f64::from(salary),
            location: String::new(),
            job_type: TYPES[ty].clone(),
            experience_level: String::new(),
            category: String::new(),
            positions: 1,
            company: company.map(|name| CompanyRef {
                id: CompanyId::new("c"),
                name,
                logo: None,
                location: None,
            }),
            created_at: Utc.timestamp_opt(day * 86_400, 0).unwrap(),
        })
}

/// Free text is the one known split: the server also matches skills, the
/// client filter only title and company. A job that matches on a skill alone
/// is returned for a delegated keyword but filtered out locally.
#[test]
fn skill_only_match_is_server_side_only() {
    let job: JobRecord = serde_json::from_value(serde_json::json!({
        "_id": "job-1",
        "title": "Backend Engineer",
        "salary": 90000,
        "jobType": "Full-Time",
        "requirements": ["Rust", "Postgres"],
        "company": { "_id": "c1", "name": "Acme" },
    }))
    .unwrap();
    let jobs = vec![job];

    let server = SearchCriteria::build(&SearchQuery::text("rust")).unwrap();
    let client = JobFilter::default().with_text("rust");

    assert_eq!(ids(&server.apply(&jobs)), vec!["job-1"]);
    assert!(client.apply(&jobs).is_empty());

    // Both sides agree once the term appears in the title or company name.
    let by_title = JobFilter::default().with_text("backend");
    let server_by_title = SearchCriteria::build(&SearchQuery::text("backend")).unwrap();
    assert_eq!(ids(by_title.apply(&jobs)), ids(&server_by_title.apply(&jobs)));
}

fn ids<'a>(jobs: impl IntoIterator<Item = &'a JobRecord>) -> Vec<String> {
    jobs.into_iter().map(|j| j.id.to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    /// Property: type, salary band and free text select the same ordered set
    /// on both sides.
    #[test]
    fn client_and_server_filters_agree(
        jobs in proptest::collection::vec(arb_job(), 0..24),
        ty in proptest::option::of(0usize..TYPES.len()),
        band in proptest::option::of(0usize..SalaryBand::ALL.len()),
        text in "[a-c]{0,2}",
    ) {
        let mut client = JobFilter::default()
            .with_text(text.clone())
            .with_sort(SortKey::Latest);
        let mut query = SearchQuery::text(text);

        if let Some(i) = ty {
            client = client.with_job_type(JobTypeFilter::Only(TYPES[i].clone()));
            query.job_type = Some(TYPES[i].to_string());
        }
        if let Some(i) = band {
            let band = SalaryBand::ALL[i];
            client = client.with_salary(band.range());
            query.salary_range = Some(band.tag().to_string());
        }

        let server = SearchCriteria::build(&query).unwrap();

        prop_assert_eq!(ids(client.apply(&jobs)), ids(&server.apply(&jobs)));
    }
}
