// src/services/walker.rs

//! Per-category page traversal.
//!
//! Drives one category through its paginated catalog: fetch page, extract
//! candidate links, filter against the run-wide dedup set, visit each
//! surviving detail page, checkpoint, repeat until the page limit or an
//! empty page.

use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::Config;
use crate::services::{BrowserEngine, CrawlSession, DetailExtractor, ListingLinkExtractor, render_page};
use crate::storage::RecordStorage;
use crate::utils::rate::RateLimiter;
use crate::utils::url::page_url;

/// Why a category walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Configured page limit reached
    PageLimit,
    /// The extractor found no candidate links at all: either the catalog
    /// is exhausted or the page layout drifted away from the selectors
    NoCandidates,
    /// Candidates were found but every one was already registered this
    /// run (category overlap, nothing new to visit)
    NoNewListings,
}

/// Summary of one category walk.
#[derive(Debug)]
pub struct CategoryOutcome {
    pub category: String,
    pub pages_fetched: u32,
    pub records_added: usize,
    pub page_failures: usize,
    pub detail_failures: usize,
    pub stop: StopReason,
}

impl CategoryOutcome {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            pages_fetched: 0,
            records_added: 0,
            page_failures: 0,
            detail_failures: 0,
            stop: StopReason::PageLimit,
        }
    }
}

/// Walks the pages of a single category.
pub struct PageWalker<'a> {
    config: &'a Config,
    links: &'a ListingLinkExtractor,
    detail: &'a DetailExtractor,
    limiter: &'a RateLimiter,
    storage: Option<&'a dyn RecordStorage>,
}

impl<'a> PageWalker<'a> {
    pub fn new(
        config: &'a Config,
        links: &'a ListingLinkExtractor,
        detail: &'a DetailExtractor,
        limiter: &'a RateLimiter,
        storage: Option<&'a dyn RecordStorage>,
    ) -> Self {
        Self {
            config,
            links,
            detail,
            limiter,
            storage,
        }
    }

    /// Walk one category to completion.
    ///
    /// Navigation failures are skipped (page level advances to the next
    /// page number, detail level to the next URL); anything else is a fatal
    /// engine failure and propagates to the orchestrator, which abandons the
    /// category.
    pub async fn walk(
        &self,
        engine: &mut dyn BrowserEngine,
        session: &mut CrawlSession,
        category: &str,
    ) -> Result<CategoryOutcome> {
        let base = Url::parse(&self.config.site.base_url)?;
        let max_pages = self.config.limits.max_pages_per_category;
        let max_items = self.config.limits.max_items_per_page;
        let mut outcome = CategoryOutcome::new(category);

        for page in 1..=max_pages {
            let url = page_url(&self.config.site.base_url, category, page);
            log::info!("[{category}] page {page}/{max_pages}: {url}");

            self.limiter.before_page().await;
            let markup = match render_page(engine, &url).await {
                Ok(markup) => markup,
                Err(e) if e.is_navigation() => {
                    log::warn!("[{category}] page {page} fetch failed, skipping: {e}");
                    outcome.page_failures += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            outcome.pages_fetched += 1;

            // Html is parsed and dropped inside this block; candidates
            // carry everything the rest of the loop needs.
            let candidates = {
                let document = Html::parse_document(&markup);
                self.links.extract(&document, &base)
            };

            if candidates.is_empty() {
                log::info!(
                    "[{category}] page {page}: no candidate links; catalog exhausted or selectors drifted"
                );
                outcome.stop = StopReason::NoCandidates;
                break;
            }

            // Register every discovered candidate, truncation comes after:
            // a URL skipped by the item cap still counts as seen.
            let fresh: Vec<String> = candidates
                .into_iter()
                .filter(|url| session.register_url(url))
                .collect();

            if fresh.is_empty() {
                log::info!("[{category}] page {page}: all candidates already seen this run");
                outcome.stop = StopReason::NoNewListings;
                break;
            }

            let batch = &fresh[..fresh.len().min(max_items)];
            if batch.len() < fresh.len() {
                log::debug!(
                    "[{category}] page {page}: visiting first {} of {} new listings",
                    batch.len(),
                    fresh.len()
                );
            }

            for detail_url in batch {
                self.limiter.before_detail().await;
                match render_page(engine, detail_url).await {
                    Ok(markup) => {
                        let record = {
                            let document = Html::parse_document(&markup);
                            self.detail.extract(&document, detail_url)
                        };
                        log::info!(
                            "[{category}] recorded {} ({} / {})",
                            detail_url,
                            record.price.as_deref().unwrap_or("-"),
                            record.area.as_deref().unwrap_or("-"),
                        );
                        session.push_record(record);
                        outcome.records_added += 1;
                    }
                    Err(e) if e.is_navigation() => {
                        log::warn!("[{category}] listing skipped: {e}");
                        outcome.detail_failures += 1;
                    }
                    Err(e) => return Err(e),
                }
            }

            self.checkpoint(session).await;
        }

        Ok(outcome)
    }

    /// Persist the accumulated records as a partial artifact. A failed
    /// checkpoint is logged and swallowed; it must not stop the walk.
    async fn checkpoint(&self, session: &CrawlSession) {
        let Some(storage) = self.storage else {
            return;
        };
        if !self.config.output.checkpoint || session.records().is_empty() {
            return;
        }

        match storage.write_checkpoint(session.records()).await {
            Ok(path) => log::info!(
                "checkpoint: {} records -> {}",
                session.records().len(),
                path.display()
            ),
            Err(e) => log::warn!("checkpoint write failed: {e}"),
        }
    }
}
