//! Heading detection from font statistics.
//!
//! # Pipeline
//!
//! ```text
//! Span[] -> body size -> noise filter -> candidates -> line merge
//!        -> score clusters -> raw levels -> gap repair -> Heading[]
//! ```
//!
//! Every step is a pure function over in-memory data; [`analyze`] runs them
//! all and keeps the intermediate statistics in a [`Detection`] report.

pub mod body;
pub mod candidates;
pub mod hierarchy;
pub mod levels;
pub mod merge;
pub mod noise;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::DetectConfig;
use crate::types::{Heading, Span};

pub use body::{char_count_by_size, find_body_size};
pub use candidates::{effective_score, select_candidates};
pub use hierarchy::{fix_level_gaps, is_densely_nested};
pub use levels::{cluster_levels, LevelMap};
pub use merge::merge_same_line;
pub use noise::{find_recurring_texts, is_caption, is_page_number};

/// Outcome of one detection run, including the statistics behind it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Detection {
    /// `(font_size, char_count)` pairs sorted by descending size.
    pub histogram: Vec<(f32, usize)>,
    pub body_size: Option<f32>,
    /// Normalized header/footer texts that were filtered out.
    pub recurring: BTreeSet<String>,
    /// `(score, level)` pairs sorted by descending score.
    pub levels: Vec<(f32, usize)>,
    pub headings: Vec<Heading>,
}

/// Detect headings in document order with dense 1-based levels.
///
/// Empty input yields no headings.
pub fn detect_headings(spans: &[Span], total_pages: usize, config: &DetectConfig) -> Vec<Heading> {
    analyze(spans, total_pages, &[], config).headings
}

/// Run the full pipeline and keep the intermediate statistics.
///
/// `page_heights` is indexed by 0-based page and only consulted when
/// `config.use_actual_page_height` is set; pass `&[]` otherwise.
pub fn analyze(
    spans: &[Span],
    total_pages: usize,
    page_heights: &[f32],
    config: &DetectConfig,
) -> Detection {
    let histogram = char_count_by_size(spans);
    let Some(body_size) = body::body_size_from_histogram(&histogram) else {
        return Detection::default();
    };

    let recurring = find_recurring_texts(spans, total_pages, page_heights, config);

    let candidates = select_candidates(spans, body_size, &recurring, config);
    let candidates = merge_same_line(candidates, config.line_merge_tolerance);

    let scores: Vec<f32> = candidates.iter().map(|c| c.score).collect();
    let level_map = cluster_levels(&scores, config.score_merge_tolerance);

    let raw: Vec<Heading> = candidates
        .into_iter()
        .filter_map(|c| {
            let level = level_map.level_of(c.score)?;
            (level <= config.max_level).then(|| Heading::new(c.text, level, c.page))
        })
        .collect();

    let headings = fix_level_gaps(raw)
        .into_iter()
        .filter(|h| h.level <= config.max_level)
        .collect();

    Detection {
        histogram,
        body_size: Some(body_size),
        recurring,
        levels: level_map.entries(),
        headings,
    }
}
