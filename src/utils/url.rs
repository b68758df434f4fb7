// src/utils/url.rs

//! URL helpers for catalog pagination and listing detection.

use regex::Regex;
use url::Url;

/// Build the catalog URL for a given category and 1-based page number.
///
/// Page 1 is the bare category path; later pages append `?page=n`,
/// which is the pagination scheme the target site uses.
///
/// # Examples
/// ```
/// use mogi_crawler::utils::url::page_url;
///
/// assert_eq!(
///     page_url("https://mogi.vn", "/ha-noi/mua-can-ho", 1),
///     "https://mogi.vn/ha-noi/mua-can-ho"
/// );
/// assert_eq!(
///     page_url("https://mogi.vn", "/ha-noi/mua-can-ho", 3),
///     "https://mogi.vn/ha-noi/mua-can-ho?page=3"
/// );
/// ```
pub fn page_url(base_url: &str, category: &str, page: u32) -> String {
    let base = base_url.trim_end_matches('/');
    if page <= 1 {
        format!("{base}{category}")
    } else {
        format!("{base}{category}?page={page}")
    }
}

/// Check whether an absolute URL has the canonical listing-detail shape.
///
/// The shape pattern is matched against the URL *path* only, so query
/// parameters never interfere. Unparsable URLs never match.
pub fn matches_listing_shape(url: &str, shape: &Regex) -> bool {
    match Url::parse(url) {
        Ok(parsed) => shape.is_match(parsed.path()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_shape() -> Regex {
        Regex::new(r"-id\d+$").unwrap()
    }

    #[test]
    fn test_page_url_first_page_is_bare() {
        assert_eq!(
            page_url("https://mogi.vn/", "/ha-noi/mua-nha-rieng", 1),
            "https://mogi.vn/ha-noi/mua-nha-rieng"
        );
    }

    #[test]
    fn test_page_url_later_pages_append_query() {
        assert_eq!(
            page_url("https://mogi.vn", "/ha-noi/mua-nha-rieng", 7),
            "https://mogi.vn/ha-noi/mua-nha-rieng?page=7"
        );
    }

    #[test]
    fn test_listing_shape_accepts_id_suffix() {
        let shape = default_shape();
        assert!(matches_listing_shape(
            "https://mogi.vn/quan-1/mat-bang-cho-thue-id123456",
            &shape
        ));
    }

    #[test]
    fn test_listing_shape_rejects_editorial_paths() {
        let shape = default_shape();
        assert!(!matches_listing_shape(
            "https://mogi.vn/tin-tuc/10-buoc-mua-nha",
            &shape
        ));
        assert!(!matches_listing_shape("https://mogi.vn/gia-nha-dat", &shape));
    }

    #[test]
    fn test_listing_shape_ignores_query_params() {
        let shape = default_shape();
        assert!(matches_listing_shape(
            "https://mogi.vn/quan-1/mua-can-ho-xyz-id99?utm_source=feed",
            &shape
        ));
    }

    #[test]
    fn test_listing_shape_unparsable_url() {
        let shape = default_shape();
        assert!(!matches_listing_shape("not a url -id123", &shape));
    }
}
