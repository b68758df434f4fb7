// src/services/detail.rs

//! Detail-page field extraction.
//!
//! Each field is filled by an ordered matcher cascade: the first matcher
//! that yields text wins, and exhausting the list leaves the field `None`.
//! Extraction never fails: a page with no recognizable structure still
//! produces a record carrying only its URL.

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{AttrField, FieldMatcher, LabelRule, ListingRecord, SelectorProfile};
use crate::utils::text::{clean_text, truncate_graphemes};

/// A matcher compiled for repeated evaluation.
enum CompiledMatcher {
    /// Dotted path into the page's JSON-LD block
    Structured(Vec<String>),
    Css(Selector),
    ClassPattern(Regex),
}

/// Result of one matcher attempt.
///
/// `Faulted` is kept distinct from `Missing` so logs can tell "no matcher
/// fired" apart from "a matcher hit broken data", even though both leave
/// the field `None`.
enum MatchAttempt {
    Found(String),
    Missing,
    Faulted,
}

/// The page's embedded structured metadata, parsed at most once.
struct StructuredDoc {
    value: Option<Value>,
    malformed: bool,
}

/// Extracts a best-effort [`ListingRecord`] from detail-page markup.
pub struct DetailExtractor {
    price: Vec<CompiledMatcher>,
    address: Vec<CompiledMatcher>,
    description: Vec<CompiledMatcher>,
    attr_row: Selector,
    attr_span: Selector,
    attr_labels: Vec<LabelRule>,
    breadcrumb: Selector,
    district_tokens: Vec<String>,
    description_limit: usize,
    any_element: Selector,
    json_ld: Selector,
}

impl DetailExtractor {
    /// Compile all matchers from a selector profile.
    ///
    /// Invalid selectors and patterns are rejected here, so extraction
    /// itself can never raise.
    pub fn new(profile: &SelectorProfile) -> Result<Self> {
        let attr_labels = profile
            .attr_labels
            .iter()
            .map(|rule| LabelRule {
                contains: rule.contains.to_lowercase(),
                field: rule.field,
            })
            .collect();

        Ok(Self {
            price: Self::compile_cascade(&profile.price)?,
            address: Self::compile_cascade(&profile.address)?,
            description: Self::compile_cascade(&profile.description)?,
            attr_row: Self::parse_selector(&profile.attr_row_selector)?,
            attr_span: Self::parse_selector("span")?,
            attr_labels,
            breadcrumb: Self::parse_selector(&profile.breadcrumb_selector)?,
            district_tokens: profile
                .district_tokens
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            description_limit: profile.description_limit,
            any_element: Self::parse_selector("*")?,
            json_ld: Self::parse_selector(r#"script[type="application/ld+json"]"#)?,
        })
    }

    /// Extract a record from one detail page. Never errors; every field
    /// falls back to `None` independently.
    pub fn extract(&self, document: &Html, url: &str) -> ListingRecord {
        let mut record = ListingRecord::new(url);
        let structured = self.parse_structured(document);

        record.price = self.run_cascade("price", &self.price, document, &structured);
        record.address = self.run_cascade("address", &self.address, document, &structured);
        record.district = record
            .address
            .as_deref()
            .and_then(|addr| self.derive_district(addr));

        self.fill_attr_fields(document, &mut record);

        record.property_type = document
            .select(&self.breadcrumb)
            .last()
            .and_then(|el| clean_text(&element_text(&el)));

        record.description = self
            .run_cascade("description", &self.description, document, &structured)
            .map(|text| truncate_graphemes(&text, self.description_limit));

        record
    }

    /// Pick the district segment out of an address: split on commas, first
    /// segment containing a region-indicator token wins.
    pub fn derive_district(&self, address: &str) -> Option<String> {
        address
            .split(',')
            .map(str::trim)
            .find(|part| {
                let lower = part.to_lowercase();
                self.district_tokens.iter().any(|t| lower.contains(t))
            })
            .map(str::to_string)
    }

    fn compile_cascade(matchers: &[FieldMatcher]) -> Result<Vec<CompiledMatcher>> {
        matchers
            .iter()
            .map(|matcher| match matcher {
                FieldMatcher::Structured { path } => Ok(CompiledMatcher::Structured(
                    path.split('.').map(str::to_string).collect(),
                )),
                FieldMatcher::Css { selector } => {
                    Ok(CompiledMatcher::Css(Self::parse_selector(selector)?))
                }
                FieldMatcher::ClassPattern { pattern } => RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(CompiledMatcher::ClassPattern)
                    .map_err(|e| AppError::config(format!("Invalid class pattern '{pattern}': {e}"))),
            })
            .collect()
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }

    /// Parse the first JSON-LD block, if any. A malformed block is noted
    /// and otherwise ignored; selector matchers take over.
    fn parse_structured(&self, document: &Html) -> StructuredDoc {
        let Some(script) = document.select(&self.json_ld).next() else {
            return StructuredDoc {
                value: None,
                malformed: false,
            };
        };

        let raw: String = script.text().collect();
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => StructuredDoc {
                value: Some(value),
                malformed: false,
            },
            Err(e) => {
                log::debug!("structured metadata unparsable, falling back to selectors: {e}");
                StructuredDoc {
                    value: None,
                    malformed: true,
                }
            }
        }
    }

    fn run_cascade(
        &self,
        field: &str,
        cascade: &[CompiledMatcher],
        document: &Html,
        structured: &StructuredDoc,
    ) -> Option<String> {
        let mut faulted = 0usize;
        for matcher in cascade {
            match self.apply(matcher, document, structured) {
                MatchAttempt::Found(text) => return Some(text),
                MatchAttempt::Missing => {}
                MatchAttempt::Faulted => faulted += 1,
            }
        }
        if faulted > 0 {
            log::debug!("field '{field}': no matcher produced text ({faulted} faulted)");
        } else {
            log::debug!("field '{field}': no matcher produced text");
        }
        None
    }

    fn apply(
        &self,
        matcher: &CompiledMatcher,
        document: &Html,
        structured: &StructuredDoc,
    ) -> MatchAttempt {
        match matcher {
            CompiledMatcher::Structured(path) => {
                if structured.malformed {
                    return MatchAttempt::Faulted;
                }
                let Some(root) = structured.value.as_ref() else {
                    return MatchAttempt::Missing;
                };
                match json_path_text(root, path) {
                    Some(text) => MatchAttempt::Found(text),
                    None => MatchAttempt::Missing,
                }
            }
            CompiledMatcher::Css(selector) => document
                .select(selector)
                .next()
                .and_then(|el| clean_text(&element_text(&el)))
                .map_or(MatchAttempt::Missing, MatchAttempt::Found),
            CompiledMatcher::ClassPattern(pattern) => document
                .select(&self.any_element)
                .find(|el| {
                    el.value()
                        .attr("class")
                        .is_some_and(|classes| pattern.is_match(classes))
                })
                .and_then(|el| clean_text(&element_text(&el)))
                .map_or(MatchAttempt::Missing, MatchAttempt::Found),
        }
    }

    /// Read label/value span pairs out of the attribute table and route
    /// them into record fields. The first row matching a field wins.
    fn fill_attr_fields(&self, document: &Html, record: &mut ListingRecord) {
        for row in document.select(&self.attr_row) {
            let spans: Vec<ElementRef> = row.select(&self.attr_span).collect();
            if spans.len() < 2 {
                continue;
            }

            let Some(label) = clean_text(&element_text(&spans[0])) else {
                continue;
            };
            let Some(value) = clean_text(&element_text(&spans[spans.len() - 1])) else {
                continue;
            };
            let label_lower = label.to_lowercase();

            for rule in &self.attr_labels {
                if !label_lower.contains(&rule.contains) {
                    continue;
                }
                let slot = match rule.field {
                    AttrField::Area => &mut record.area,
                    AttrField::Bedrooms => &mut record.bedrooms,
                    AttrField::Bathrooms => &mut record.bathrooms,
                    AttrField::PostedDate => &mut record.posted_date,
                };
                if slot.is_none() {
                    *slot = Some(value.clone());
                }
                break;
            }
        }
    }
}

/// Inner text of an element, segments concatenated.
fn element_text(element: &ElementRef) -> String {
    element.text().collect()
}

/// Walk a dotted path through a JSON value and render the leaf as cleaned
/// text. Strings and numbers count; anything else is a miss.
fn json_path_text(root: &Value, path: &[String]) -> Option<String> {
    let mut current = root;
    for key in path {
        current = current.get(key)?;
    }
    match current {
        Value::String(s) => clean_text(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectorProfile;

    fn extractor() -> DetailExtractor {
        DetailExtractor::new(&SelectorProfile::default()).unwrap()
    }

    const URL: &str = "https://mogi.vn/quan-hai-ba-trung/mua-can-ho-abc-id123456";

    #[test]
    fn test_full_page_extraction() {
        let html = Html::parse_document(
            r#"
            <ul class="breadcrumb">
              <li><a href="/">Trang chủ</a></li>
              <li><a href="/ha-noi">Hà Nội</a></li>
              <li><a href="/ha-noi/mua-can-ho">Căn hộ chung cư</a></li>
            </ul>
            <div class="price">  5   tỷ </div>
            <div class="address">Số 10, Phường Bạch Mai, Quận Hai Bà Trưng, Hà Nội</div>
            <div class="info-attr"><span>Diện tích</span><span>50 m²</span></div>
            <div class="info-attr"><span>Phòng ngủ</span><span>2</span></div>
            <div class="info-attr"><span>Nhà tắm</span><span>1</span></div>
            <div class="info-attr"><span>Ngày đăng</span><span>01/08/2026</span></div>
            <div class="introduction">Căn hộ   thoáng mát, gần trung tâm.</div>
            "#,
        );

        let record = extractor().extract(&html, URL);
        assert_eq!(record.url, URL);
        assert_eq!(record.price.as_deref(), Some("5 tỷ"));
        assert_eq!(
            record.address.as_deref(),
            Some("Số 10, Phường Bạch Mai, Quận Hai Bà Trưng, Hà Nội")
        );
        assert_eq!(record.district.as_deref(), Some("Quận Hai Bà Trưng"));
        assert_eq!(record.area.as_deref(), Some("50 m²"));
        assert_eq!(record.bedrooms.as_deref(), Some("2"));
        assert_eq!(record.bathrooms.as_deref(), Some("1"));
        assert_eq!(record.posted_date.as_deref(), Some("01/08/2026"));
        assert_eq!(record.property_type.as_deref(), Some("Căn hộ chung cư"));
        assert_eq!(
            record.description.as_deref(),
            Some("Căn hộ thoáng mát, gần trung tâm.")
        );
    }

    #[test]
    fn test_bare_page_yields_record_with_nulls() {
        let html = Html::parse_document("<html><body><p>đang tải…</p></body></html>");
        let record = extractor().extract(&html, URL);
        assert_eq!(record.url, URL);
        assert!(record.price.is_none());
        assert!(record.area.is_none());
        assert!(record.address.is_none());
        assert!(record.district.is_none());
        assert!(record.property_type.is_none());
        assert!(record.description.is_none());
    }

    #[test]
    fn test_structured_metadata_wins_for_price_and_address() {
        let html = Html::parse_document(
            r#"
            <script type="application/ld+json">
            {"offers": {"price": "4.2 tỷ"},
             "address": {"streetAddress": "Ngõ 9, Quận Đống Đa, Hà Nội"}}
            </script>
            <div class="price">5 tỷ</div>
            <div class="address">somewhere else</div>
            "#,
        );
        let record = extractor().extract(&html, URL);
        assert_eq!(record.price.as_deref(), Some("4.2 tỷ"));
        assert_eq!(
            record.address.as_deref(),
            Some("Ngõ 9, Quận Đống Đa, Hà Nội")
        );
        assert_eq!(record.district.as_deref(), Some("Quận Đống Đa"));
    }

    #[test]
    fn test_malformed_structured_metadata_falls_through() {
        let html = Html::parse_document(
            r#"
            <script type="application/ld+json">{not json at all</script>
            <div class="price">3,5 tỷ</div>
            "#,
        );
        let record = extractor().extract(&html, URL);
        assert_eq!(record.price.as_deref(), Some("3,5 tỷ"));
    }

    #[test]
    fn test_numeric_structured_price() {
        let html = Html::parse_document(
            r#"<script type="application/ld+json">{"offers":{"price":5200000000}}</script>"#,
        );
        let record = extractor().extract(&html, URL);
        assert_eq!(record.price.as_deref(), Some("5200000000"));
    }

    #[test]
    fn test_class_pattern_fallback() {
        let html = Html::parse_document(
            r#"<div class="DealPrice__wrapper">1,9 tỷ</div>"#,
        );
        let record = extractor().extract(&html, URL);
        // No .price element; the case-insensitive class pattern catches it.
        assert_eq!(record.price.as_deref(), Some("1,9 tỷ"));
    }

    #[test]
    fn test_district_requires_region_token() {
        let ex = extractor();
        assert_eq!(
            ex.derive_district("Số 10, Phường Bạch Mai, Quận Hai Bà Trưng, Hà Nội"),
            Some("Quận Hai Bà Trưng".to_string())
        );
        assert_eq!(
            ex.derive_district("Thôn Đoài, Xã Tam Hiệp, Hà Nội"),
            None
        );
        // Case-insensitive token match.
        assert_eq!(
            ex.derive_district("số 5, QUẬN BA ĐÌNH, Hà Nội"),
            Some("QUẬN BA ĐÌNH".to_string())
        );
    }

    #[test]
    fn test_description_cascade_and_truncation() {
        let long = "mô tả ".repeat(200);
        let html = Html::parse_document(&format!(
            r#"<div class="info-content-body">{long}</div>"#
        ));
        let record = extractor().extract(&html, URL);
        let description = record.description.unwrap();
        assert!(description.chars().count() <= 500);
        assert!(description.starts_with("mô tả"));
    }

    #[test]
    fn test_first_attr_row_wins_per_field() {
        let html = Html::parse_document(
            r#"
            <div class="info-attr"><span>Diện tích</span><span>50 m²</span></div>
            <div class="info-attr"><span>Diện tích đất</span><span>80 m²</span></div>
            "#,
        );
        let record = extractor().extract(&html, URL);
        assert_eq!(record.area.as_deref(), Some("50 m²"));
    }

    #[test]
    fn test_attr_row_with_single_span_is_skipped() {
        let html = Html::parse_document(
            r#"<div class="info-attr"><span>Diện tích</span></div>"#,
        );
        let record = extractor().extract(&html, URL);
        assert!(record.area.is_none());
    }
}
