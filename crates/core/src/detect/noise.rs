//! Predicates for text that must never become a heading: running
//! headers/footers, page numbers, and figure/table captions.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::DetectConfig;
use crate::types::Span;

/// Trim and lowercase; the identity used for recurring-text matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Height of `page` for zone computations.
///
/// The nominal height wins unless the config opts into actual heights and
/// the caller supplied one for this page.
pub fn zone_page_height(page: usize, page_heights: &[f32], config: &DetectConfig) -> f32 {
    if config.use_actual_page_height {
        if let Some(&h) = page_heights.get(page) {
            if h > 0.0 {
                return h;
            }
        }
    }
    config.page_height
}

/// Normalized texts that sit in the top/bottom zone of enough pages to be a
/// running header or footer.
pub fn find_recurring_texts(
    spans: &[Span],
    total_pages: usize,
    page_heights: &[f32],
    config: &DetectConfig,
) -> BTreeSet<String> {
    if total_pages < config.min_recurring_pages {
        return BTreeSet::new();
    }

    let mut zone_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut seen_per_page: HashSet<(usize, String)> = HashSet::new();

    for span in spans {
        let page_h = zone_page_height(span.page, page_heights, config);
        let top_zone = page_h * config.zone_fraction;
        let bottom_zone = page_h * (1.0 - config.zone_fraction);

        if span.bbox.y0 < top_zone || span.bbox.y1 > bottom_zone {
            let normalized = normalize(&span.text);
            if normalized.is_empty() {
                continue;
            }
            if seen_per_page.insert((span.page, normalized.clone())) {
                *zone_counts.entry(normalized).or_insert(0) += 1;
            }
        }
    }

    let min_count = recurrence_min_count(total_pages, config);
    zone_counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(text, _)| text)
        .collect()
}

/// Number of distinct pages a zone text needs to be classified as recurring.
pub fn recurrence_min_count(total_pages: usize, config: &DetectConfig) -> usize {
    let scaled = (total_pages as f64 * f64::from(config.recurrence_threshold)).floor() as usize;
    config.min_recurrence_count.max(scaled)
}

/// Digits, roman numerals, or "Page N".
pub fn is_page_number(text: &str) -> bool {
    static RE_DIGITS: OnceLock<Regex> = OnceLock::new();
    static RE_ROMAN: OnceLock<Regex> = OnceLock::new();
    static RE_PAGE: OnceLock<Regex> = OnceLock::new();

    let stripped = text.trim();
    let re_digits = RE_DIGITS.get_or_init(|| Regex::new(r"^\d+$").unwrap());
    let re_roman = RE_ROMAN.get_or_init(|| Regex::new(r"(?i)^[ivxlcdm]+$").unwrap());
    let re_page = RE_PAGE.get_or_init(|| Regex::new(r"(?i)^page\s+\d+$").unwrap());

    re_digits.is_match(stripped) || re_roman.is_match(stripped) || re_page.is_match(stripped)
}

/// "Figure 3", "Fig. 2", "Table 1", "Listing 4", "Algorithm 2", ...
pub fn is_caption(text: &str) -> bool {
    static RE_CAPTION: OnceLock<Regex> = OnceLock::new();
    let re = RE_CAPTION.get_or_init(|| {
        Regex::new(r"(?i)^(Figure|Fig\.|Table|Listing|Algorithm)\s+\d").unwrap()
    });
    re.is_match(text.trim())
}

/// Whether a span is noise and must be skipped by the candidate selector.
pub fn is_noise(span: &Span, recurring: &BTreeSet<String>) -> bool {
    recurring.contains(&normalize(&span.text)) || is_page_number(&span.text) || is_caption(&span.text)
}
