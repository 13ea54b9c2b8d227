use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::DetectConfig;
use crate::types::{Candidate, Span};

use super::noise::is_noise;

/// Ranking key for heading candidates: size plus a bonus for bold text.
pub fn effective_score(size: f32, bold: bool, config: &DetectConfig) -> f32 {
    size + if bold { config.bold_bonus } else { 0.0 }
}

/// Pick the spans styled above body text, skipping noise and stray glyphs.
///
/// Body text is scored as non-bold, so bold text at body size qualifies.
pub fn select_candidates(
    spans: &[Span],
    body_size: f32,
    recurring: &BTreeSet<String>,
    config: &DetectConfig,
) -> Vec<Candidate> {
    let body_score = effective_score(body_size, false, config);

    spans
        .iter()
        .filter(|span| !is_noise(span, recurring))
        .filter_map(|span| {
            let score = effective_score(span.size, span.bold, config);
            if score <= body_score {
                return None;
            }

            let text = span.text.trim();
            if text.chars().count() < config.min_heading_chars && !starts_with_digit(text) {
                return None;
            }

            Some(Candidate {
                text: text.to_string(),
                size: span.size,
                bold: span.bold,
                score,
                bbox: span.bbox,
                page: span.page,
            })
        })
        .collect()
}

/// Any Unicode decimal digit, so "٣. Scope" counts as numbered.
fn starts_with_digit(text: &str) -> bool {
    static RE_LEADING_DIGIT: OnceLock<Regex> = OnceLock::new();
    let re = RE_LEADING_DIGIT.get_or_init(|| Regex::new(r"^\d").unwrap());
    re.is_match(text)
}
