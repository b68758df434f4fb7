//! Listing record data structure.

use serde::{Deserialize, Serialize};

/// One extracted real-estate listing.
///
/// Field declaration order is the CSV column order. Every field except
/// `url` is optional: `None` means no extraction heuristic produced text
/// for it, which is a normal outcome, not an error. Price and area stay
/// raw display strings ("5 tỷ", "50 m²"); parsing them into numbers is the
/// analytics stage's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Canonical absolute detail-page URL; unique within one run
    pub url: String,

    /// Raw price display string
    pub price: Option<String>,

    /// Raw area display string
    pub area: Option<String>,

    /// Full address display string
    pub address: Option<String>,

    /// Address segment carrying a district/region marker
    pub district: Option<String>,

    /// Bedroom count as displayed
    pub bedrooms: Option<String>,

    /// Bathroom count as displayed
    pub bathrooms: Option<String>,

    /// Last breadcrumb segment of the page's category trail
    pub property_type: Option<String>,

    /// Posting date as displayed
    pub posted_date: Option<String>,

    /// Listing description, truncated to the configured budget
    pub description: Option<String>,
}

impl ListingRecord {
    /// Create an empty record for a URL; the extractor fills in fields.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            price: None,
            area: None,
            address: None,
            district: None,
            bedrooms: None,
            bathrooms: None,
            property_type: None,
            posted_date: None,
            description: None,
        }
    }
}
