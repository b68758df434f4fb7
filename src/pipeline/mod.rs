//! Pipeline entry points for crawler operations.
//!
//! - `run_crawl`: walk every configured category and write the final CSV

pub mod crawl;

pub use crawl::{RunSummary, run_crawl};
