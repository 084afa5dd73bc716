//! Filter & search pipeline over the cached jobs collection.
//!
//! Produces views; never mutates the cache.

use core::str::FromStr;

use jobboard_core::{DomainError, JobRecord, JobType, SalaryRange, SortKey};

/// Job-type predicate: `"all"` or one job type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JobTypeFilter {
    #[default]
    All,
    Only(JobType),
}

impl JobTypeFilter {
    pub fn matches(&self, job_type: &JobType) -> bool {
        match self {
            JobTypeFilter::All => true,
            JobTypeFilter::Only(wanted) => wanted == job_type,
        }
    }
}

impl FromStr for JobTypeFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(JobTypeFilter::All)
        } else {
            s.parse().map(JobTypeFilter::Only)
        }
    }
}

/// Independent predicates plus an optional ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub job_type: JobTypeFilter,
    /// Matched case-insensitively against the title and the company name.
    pub text: String,
    pub salary: SalaryRange,
    /// `None` keeps the cache order.
    pub sort: Option<SortKey>,
}

impl JobFilter {
    pub fn with_job_type(mut self, job_type: JobTypeFilter) -> Self {
        self.job_type = job_type;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_salary(mut self, salary: SalaryRange) -> Self {
        self.salary = salary;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        self.job_type.matches(&job.job_type) && self.matches_text(job) && self.salary.contains(job.salary)
    }

    fn matches_text(&self, job: &JobRecord) -> bool {
        let term = self.text.trim();
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        job.title.to_lowercase().contains(&term)
            || job
                .company_name()
                .is_some_and(|name| name.to_lowercase().contains(&term))
    }

    /// Records passing every predicate, in cache order unless a sort key is set.
    pub fn apply<'a>(&self, jobs: &'a [JobRecord]) -> Vec<&'a JobRecord> {
        let mut view: Vec<&JobRecord> = jobs.iter().filter(|j| self.matches(j)).collect();
        if let Some(sort) = self.sort {
            // Stable: equal keys keep cache order.
            view.sort_by(|a, b| sort.compare(a, b));
        }
        view
    }
}

/// One rendered page of a filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: Vec<&'a JobRecord>,
    /// Length of the full filtered view.
    pub total: usize,
    pub has_more: bool,
}

/// Filtered list with a "load more" visible count.
///
/// Changing the filter resets the visible count to one page.
#[derive(Debug, Clone)]
pub struct JobListView {
    filter: JobFilter,
    page_size: usize,
    visible: usize,
}

impl JobListView {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            filter: JobFilter::default(),
            page_size,
            visible: page_size,
        }
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    /// Replace the filter; returns whether it changed (and the count reset).
    pub fn set_filter(&mut self, filter: JobFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.visible = self.page_size;
        true
    }

    /// Grow the visible prefix by one page, capped at the filtered length.
    pub fn load_more(&mut self, jobs: &[JobRecord]) -> usize {
        let total = self.filter.apply(jobs).len();
        self.visible = self.visible.saturating_add(self.page_size).min(total).max(self.page_size);
        self.visible_count(total)
    }

    /// Number of items shown for a filtered view of `total` records.
    pub fn visible_count(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    pub fn render<'a>(&self, jobs: &'a [JobRecord]) -> Page<'a> {
        let mut items = self.filter.apply(jobs);
        let total = items.len();
        items.truncate(self.visible_count(total));
        Page {
            has_more: items.len() < total,
            items,
            total,
        }
    }
}
