// src/models/mod.rs

//! Domain models for the crawler application.

mod config;
mod listing;
mod selectors;

// Re-export all public types
pub use config::{Config, CrawlerConfig, LimitsConfig, OutputConfig, SiteConfig};
pub use listing::ListingRecord;
pub use selectors::{AttrField, FieldMatcher, LabelRule, SelectorProfile};
