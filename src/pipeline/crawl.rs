// src/pipeline/crawl.rs

//! Run orchestration across categories.
//!
//! The orchestrator is the only component with a view across categories:
//! it owns the session (dedup set + record sequence), hands it to the page
//! walker one category at a time, and performs the terminal write.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::services::{
    BrowserEngine, CategoryOutcome, CrawlSession, DetailExtractor, ListingLinkExtractor,
    PageWalker,
};
use crate::storage::RecordStorage;
use crate::utils::rate::RateLimiter;

/// Summary of a whole crawl run.
#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_records: usize,
    pub unique_urls: usize,
    pub category_failures: usize,
    pub categories: Vec<CategoryOutcome>,
    /// Final artifact path; `None` when the run gathered nothing
    pub output_path: Option<PathBuf>,
}

/// Crawl every configured category in order and write the final artifact.
///
/// `make_engine` builds a fresh engine per category, so a fatal engine
/// failure is contained: the category is abandoned, already-gathered
/// results stay intact, and the run moves on. Navigation-level failures
/// never reach this function; the walker skips over them.
pub async fn run_crawl<E, F>(
    config: &Config,
    storage: &dyn RecordStorage,
    mut make_engine: F,
) -> Result<RunSummary>
where
    E: BrowserEngine,
    F: FnMut() -> Result<E>,
{
    config.validate()?;

    let links = ListingLinkExtractor::new(&config.extraction)?;
    let detail = DetailExtractor::new(&config.extraction)?;
    let limiter = RateLimiter::new(config.crawler.page_delay, config.crawler.detail_delay);
    let walker = PageWalker::new(config, &links, &detail, &limiter, Some(storage));

    let started_at = Utc::now();
    let mut session = CrawlSession::new();
    let mut categories = Vec::new();
    let mut category_failures = 0usize;

    for category in &config.site.categories {
        log::info!("=== category {category} ===");

        let mut engine = match make_engine() {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("[{category}] engine unavailable, abandoning category: {e}");
                category_failures += 1;
                continue;
            }
        };

        match walker.walk(&mut engine, &mut session, category).await {
            Ok(outcome) => {
                log::info!(
                    "[{category}] done: {} records over {} pages ({:?}), {} page / {} detail failures",
                    outcome.records_added,
                    outcome.pages_fetched,
                    outcome.stop,
                    outcome.page_failures,
                    outcome.detail_failures,
                );
                categories.push(outcome);
            }
            Err(e) => {
                log::error!("[{category}] walk aborted, continuing with next category: {e}");
                category_failures += 1;
            }
        }
    }

    let unique_urls = session.seen_count();
    let records = session.into_records();

    let output_path = if records.is_empty() {
        log::warn!("no records gathered; skipping final write");
        None
    } else {
        let path = storage.write_final(&records).await?;
        log::info!("final output: {} records -> {}", records.len(), path.display());
        Some(path)
    };

    Ok(RunSummary {
        started_at,
        finished_at: Utc::now(),
        total_records: records.len(),
        unique_urls,
        category_failures,
        categories,
        output_path,
    })
}
