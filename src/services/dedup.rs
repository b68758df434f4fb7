// src/services/dedup.rs

//! Run-scoped URL deduplication.
//!
//! One membership set spans the whole run, not one per category: the same
//! listing routinely appears under several overlapping category feeds, and
//! this set is what keeps it from being recorded twice.
//!
//! Keys are resolved absolute URLs compared by exact string equality. Query
//! strings are not normalized, so two URLs differing only in query
//! parameters count as distinct listings. Known limitation.

use std::collections::HashSet;

/// Membership set of canonical listing URLs already registered this run.
#[derive(Debug, Default)]
pub struct SeenUrls {
    seen: HashSet<String>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test-and-insert. Returns true when the URL was newly registered.
    pub fn insert(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    /// Number of URLs registered so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
