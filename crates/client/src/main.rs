use std::sync::Arc;

use anyhow::Context;
use jobboard_client::{
    ClientConfig, ConsumerKind, FetchOutcome, HttpTransport, JobFilter, JobListView, JobsMode,
    SyncPolicy,
};

/// One-shot sync: fetch the jobs collection (optionally for a keyword) and
/// log the first page.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobboard_observability::init();

    let config = ClientConfig::from_env()?;
    let keyword = std::env::args().nth(1).unwrap_or_default();

    let transport = HttpTransport::new(&config).context("building HTTP transport")?;
    let policy = SyncPolicy::from_config(&config, Arc::new(transport));
    policy.store().set_search_keyword(keyword.as_str());

    let (_, outcome) = policy.mount(ConsumerKind::Jobs).await;
    if let FetchOutcome::Failed(err) = &outcome {
        anyhow::bail!("jobs fetch failed: {err}");
    }

    let jobs = policy.store().jobs();
    let mut view = JobListView::new(config.page_size);
    // Delegated mode already filtered server-side.
    if policy.mode() == JobsMode::FetchThenFilter {
        view.set_filter(JobFilter::default().with_text(keyword));
    }
    let page = view.render(&jobs);

    tracing::info!(api_url = %config.api_url, total = page.total, shown = page.items.len(), "jobs synced");
    for job in page.items {
        tracing::info!(id = %job.id, title = %job.title, company = job.company_name().unwrap_or("-"), "job");
    }
    Ok(())
}
