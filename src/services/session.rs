// src/services/session.rs

//! Run-lifetime crawl state.

use crate::models::ListingRecord;
use crate::services::SeenUrls;

/// State accumulated over one crawl run.
///
/// Owns the dedup registry and the ordered record sequence. The orchestrator
/// creates one session per run and lends it to the page walker; records land
/// in discovery order (category order, then page order, then in-page order)
/// and are never reordered afterwards.
#[derive(Debug, Default)]
pub struct CrawlSession {
    seen: SeenUrls,
    records: Vec<ListingRecord>,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a discovered URL. True when it is new to this run.
    pub fn register_url(&mut self, url: &str) -> bool {
        self.seen.insert(url)
    }

    /// Append a record; insertion order is the output order.
    pub fn push_record(&mut self, record: ListingRecord) {
        self.records.push(record);
    }

    /// Records gathered so far, in discovery order.
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Number of unique URLs registered (visited or truncated away).
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Consume the session, yielding the final record sequence.
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_url_dedups_across_calls() {
        let mut session = CrawlSession::new();
        assert!(session.register_url("https://mogi.vn/a-id1"));
        assert!(!session.register_url("https://mogi.vn/a-id1"));
        assert!(session.register_url("https://mogi.vn/b-id2"));
        assert_eq!(session.seen_count(), 2);
    }

    #[test]
    fn test_records_keep_insertion_order() {
        let mut session = CrawlSession::new();
        session.push_record(ListingRecord::new("https://mogi.vn/a-id1"));
        session.push_record(ListingRecord::new("https://mogi.vn/b-id2"));
        let urls: Vec<_> = session.records().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://mogi.vn/a-id1", "https://mogi.vn/b-id2"]);
    }
}
