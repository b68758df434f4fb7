// src/models/selectors.rs

//! Extraction heuristics carried as configuration data.
//!
//! Every field is extracted by walking an ordered matcher list until one
//! yields text; keeping the lists in config means a site layout change is
//! a config edit, not a code change.

use serde::{Deserialize, Serialize};

/// A single extraction attempt for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldMatcher {
    /// Dotted path into the page's embedded JSON-LD block
    /// (e.g. "offers.price").
    Structured { path: String },

    /// CSS selector; first matching element's inner text wins.
    Css { selector: String },

    /// Case-insensitive regex tested against each element's class
    /// attribute; first matching element's inner text wins.
    ClassPattern { pattern: String },
}

/// Which record field a label/value attribute row feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrField {
    Area,
    Bedrooms,
    Bathrooms,
    PostedDate,
}

/// Maps an attribute-row label substring to a record field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRule {
    /// Lowercased substring to look for in the label span
    pub contains: String,

    /// Field the value span fills
    pub field: AttrField,
}

/// The full set of extraction heuristics for one site layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorProfile {
    /// Selector enumerating candidate detail links on a catalog page
    #[serde(default = "defaults::listing_link_selector")]
    pub listing_link_selector: String,

    /// Attribute holding the link target
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Path pattern a detail URL must match (trailing numeric id)
    #[serde(default = "defaults::listing_url_pattern")]
    pub listing_url_pattern: String,

    /// Matcher cascade for the price field
    #[serde(default = "defaults::price_matchers")]
    pub price: Vec<FieldMatcher>,

    /// Matcher cascade for the address field
    #[serde(default = "defaults::address_matchers")]
    pub address: Vec<FieldMatcher>,

    /// Matcher cascade for the description field
    #[serde(default = "defaults::description_matchers")]
    pub description: Vec<FieldMatcher>,

    /// Selector for label/value attribute rows on a detail page
    #[serde(default = "defaults::attr_row_selector")]
    pub attr_row_selector: String,

    /// Label substrings routing attribute rows into record fields
    #[serde(default = "defaults::attr_labels")]
    pub attr_labels: Vec<LabelRule>,

    /// Selector for the category breadcrumb trail
    #[serde(default = "defaults::breadcrumb_selector")]
    pub breadcrumb_selector: String,

    /// Region-indicator tokens used to pick the district out of an address
    #[serde(default = "defaults::district_tokens")]
    pub district_tokens: Vec<String>,

    /// Description length budget in grapheme clusters
    #[serde(default = "defaults::description_limit")]
    pub description_limit: usize,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self {
            listing_link_selector: defaults::listing_link_selector(),
            link_attr: defaults::link_attr(),
            listing_url_pattern: defaults::listing_url_pattern(),
            price: defaults::price_matchers(),
            address: defaults::address_matchers(),
            description: defaults::description_matchers(),
            attr_row_selector: defaults::attr_row_selector(),
            attr_labels: defaults::attr_labels(),
            breadcrumb_selector: defaults::breadcrumb_selector(),
            district_tokens: defaults::district_tokens(),
            description_limit: defaults::description_limit(),
        }
    }
}

mod defaults {
    use super::{AttrField, FieldMatcher, LabelRule};

    pub fn listing_link_selector() -> String {
        "a".into()
    }

    pub fn link_attr() -> String {
        "href".into()
    }

    pub fn listing_url_pattern() -> String {
        r"-id\d+$".into()
    }

    pub fn price_matchers() -> Vec<FieldMatcher> {
        vec![
            FieldMatcher::Structured {
                path: "offers.price".into(),
            },
            FieldMatcher::Css {
                selector: ".price".into(),
            },
            FieldMatcher::ClassPattern {
                pattern: "price".into(),
            },
        ]
    }

    pub fn address_matchers() -> Vec<FieldMatcher> {
        vec![
            FieldMatcher::Structured {
                path: "address.streetAddress".into(),
            },
            FieldMatcher::Css {
                selector: ".address".into(),
            },
            FieldMatcher::ClassPattern {
                pattern: "address".into(),
            },
        ]
    }

    pub fn description_matchers() -> Vec<FieldMatcher> {
        vec![
            FieldMatcher::Css {
                selector: ".introduction".into(),
            },
            FieldMatcher::Css {
                selector: ".property-description".into(),
            },
            FieldMatcher::Css {
                selector: ".info-content-body".into(),
            },
            FieldMatcher::ClassPattern {
                pattern: "description".into(),
            },
        ]
    }

    pub fn attr_row_selector() -> String {
        ".info-attr".into()
    }

    pub fn attr_labels() -> Vec<LabelRule> {
        vec![
            LabelRule {
                contains: "diện tích".into(),
                field: AttrField::Area,
            },
            LabelRule {
                contains: "phòng ngủ".into(),
                field: AttrField::Bedrooms,
            },
            LabelRule {
                contains: "nhà tắm".into(),
                field: AttrField::Bathrooms,
            },
            LabelRule {
                contains: "toilet".into(),
                field: AttrField::Bathrooms,
            },
            LabelRule {
                contains: "ngày đăng".into(),
                field: AttrField::PostedDate,
            },
        ]
    }

    pub fn breadcrumb_selector() -> String {
        ".breadcrumb li a".into()
    }

    pub fn district_tokens() -> Vec<String> {
        vec!["quận".into(), "huyện".into()]
    }

    pub fn description_limit() -> usize {
        500
    }
}
