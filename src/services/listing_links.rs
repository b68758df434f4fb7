// src/services/listing_links.rs

//! Catalog-page link discovery.
//!
//! Turns one parsed catalog page into the ordered list of detail-page URLs
//! worth visiting. DOM order is preserved end to end: it becomes the record
//! discovery order that truncation and dedup tie-breaking rely on.

use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SelectorProfile;
use crate::utils::resolve_url;
use crate::utils::url::matches_listing_shape;

/// Extracts candidate detail-page URLs from catalog markup.
pub struct ListingLinkExtractor {
    link_selector: Selector,
    link_attr: String,
    shape: Regex,
}

impl ListingLinkExtractor {
    /// Compile the extractor from a selector profile.
    pub fn new(profile: &SelectorProfile) -> Result<Self> {
        let link_selector = Selector::parse(&profile.listing_link_selector)
            .map_err(|e| AppError::selector(&profile.listing_link_selector, format!("{e:?}")))?;
        let shape = Regex::new(&profile.listing_url_pattern).map_err(|e| {
            AppError::config(format!(
                "Invalid listing_url_pattern '{}': {e}",
                profile.listing_url_pattern
            ))
        })?;

        Ok(Self {
            link_selector,
            link_attr: profile.link_attr.clone(),
            shape,
        })
    }

    /// Enumerate hyperlinks in DOM order, resolve them against the base,
    /// and keep only URLs with the canonical listing shape.
    ///
    /// Within-page repeats are dropped while keeping first-seen order. An
    /// empty result is a normal value; the page walker reads it as the
    /// end-of-results signal.
    pub fn extract(&self, document: &Html, base: &Url) -> Vec<String> {
        let mut links = Vec::new();
        let mut seen_on_page = HashSet::new();

        for element in document.select(&self.link_selector) {
            let Some(href) = element.value().attr(&self.link_attr) else {
                continue;
            };
            if href.is_empty() {
                continue;
            }

            let absolute = resolve_url(base, href);
            if !absolute.starts_with("http") {
                continue;
            }
            if !matches_listing_shape(&absolute, &self.shape) {
                continue;
            }
            if seen_on_page.insert(absolute.clone()) {
                links.push(absolute);
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectorProfile;

    fn extractor() -> ListingLinkExtractor {
        ListingLinkExtractor::new(&SelectorProfile::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://mogi.vn/ha-noi/mua-can-ho").unwrap()
    }

    #[test]
    fn test_extracts_listing_links_in_dom_order() {
        let html = Html::parse_document(
            r#"
            <nav><a href="/ha-noi/mua-nha-rieng">Nhà riêng</a></nav>
            <div class="prop">
              <a class="link-overlay" href="/quan-ba-dinh/mua-can-ho-cc-a-id111"></a>
              <a class="link-overlay" href="/quan-hai-ba-trung/mua-can-ho-b-id222"></a>
            </div>
            <footer><a href="/10-buoc-mua-nha">Cẩm nang</a></footer>
            "#,
        );

        let links = extractor().extract(&html, &base());
        assert_eq!(
            links,
            vec![
                "https://mogi.vn/quan-ba-dinh/mua-can-ho-cc-a-id111",
                "https://mogi.vn/quan-hai-ba-trung/mua-can-ho-b-id222",
            ]
        );
    }

    #[test]
    fn test_absolute_links_pass_through() {
        let html = Html::parse_document(
            r#"<a href="https://mogi.vn/quan-1/mua-nha-pho-id333">x</a>"#,
        );
        let links = extractor().extract(&html, &base());
        assert_eq!(links, vec!["https://mogi.vn/quan-1/mua-nha-pho-id333"]);
    }

    #[test]
    fn test_within_page_repeats_collapse_to_first() {
        let html = Html::parse_document(
            r#"
            <a href="/quan-1/mua-can-ho-id444">thumb</a>
            <a href="/quan-1/mua-can-ho-id555">other</a>
            <a href="/quan-1/mua-can-ho-id444">title</a>
            "#,
        );
        let links = extractor().extract(&html, &base());
        assert_eq!(
            links,
            vec![
                "https://mogi.vn/quan-1/mua-can-ho-id444",
                "https://mogi.vn/quan-1/mua-can-ho-id555",
            ]
        );
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let html = Html::parse_document(
            r#"<a href="/gia-nha-dat">Giá</a><a href="/tin-tuc/thi-truong">Tin</a>"#,
        );
        assert!(extractor().extract(&html, &base()).is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = Html::parse_document(r#"<a name="top"></a><a href="">x</a>"#);
        assert!(extractor().extract(&html, &base()).is_empty());
    }

    #[test]
    fn test_invalid_selector_fails_construction() {
        let mut profile = SelectorProfile::default();
        profile.listing_link_selector = "[[broken".into();
        assert!(ListingLinkExtractor::new(&profile).is_err());
    }

    #[test]
    fn test_invalid_shape_pattern_fails_construction() {
        let mut profile = SelectorProfile::default();
        profile.listing_url_pattern = "(".into();
        assert!(ListingLinkExtractor::new(&profile).is_err());
    }
}
