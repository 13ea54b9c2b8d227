use std::collections::BTreeMap;

use crate::types::{from_hundredths, hundredths, Span};

/// Total character count per font size, sorted by descending size.
pub fn char_count_by_size(spans: &[Span]) -> Vec<(f32, usize)> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for span in spans {
        *counts.entry(hundredths(span.size)).or_insert(0) += span.text.chars().count();
    }
    counts
        .into_iter()
        .rev()
        .map(|(key, count)| (from_hundredths(key), count))
        .collect()
}

/// The font size carrying the most characters is body text.
///
/// Ties go to the larger size. Returns `None` for an empty span list.
pub fn find_body_size(spans: &[Span]) -> Option<f32> {
    body_size_from_histogram(&char_count_by_size(spans))
}

/// Same as [`find_body_size`] over a precomputed descending histogram.
pub fn body_size_from_histogram(histogram: &[(f32, usize)]) -> Option<f32> {
    let mut best: Option<(f32, usize)> = None;
    for &(size, count) in histogram {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((size, count)),
        }
    }
    best.map(|(size, _)| size)
}
