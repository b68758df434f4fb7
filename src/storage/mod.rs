//! Storage abstractions for record persistence.
//!
//! Two kinds of artifact come out of a run:
//! - **Checkpoints**: timestamped partial CSVs written after each page
//!   batch, so an interruption loses at most the in-flight page.
//! - **Final**: the authoritative CSV written once by the orchestrator
//!   after the last category completes.

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ListingRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for record storage backends.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Write a timestamped partial artifact with the records so far.
    async fn write_checkpoint(&self, records: &[ListingRecord]) -> Result<PathBuf>;

    /// Write the authoritative final artifact.
    async fn write_final(&self, records: &[ListingRecord]) -> Result<PathBuf>;
}
