// src/utils/text.rs

//! Text cleaning helpers shared by the extractors.

use unicode_segmentation::UnicodeSegmentation;

/// Collapse all runs of whitespace into single spaces and trim the ends.
///
/// Returns `None` when nothing but whitespace remains, so callers can
/// treat an empty element as an extraction miss.
pub fn clean_text(text: &str) -> Option<String> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Truncate a string to at most `limit` grapheme clusters.
///
/// Counting graphemes rather than bytes or code points keeps Vietnamese
/// combining sequences intact at the cut point.
pub fn truncate_graphemes(text: &str, limit: usize) -> String {
    match text.grapheme_indices(true).nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
