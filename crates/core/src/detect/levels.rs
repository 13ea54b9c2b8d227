use std::collections::BTreeMap;

use crate::types::{from_hundredths, hundredths};

/// Mapping from a style score to its heading level.
///
/// Scores are keyed in hundredths of a point so lookups are exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    levels: BTreeMap<i64, usize>,
}

impl LevelMap {
    /// Level assigned to `score`, if the score was clustered.
    pub fn level_of(&self, score: f32) -> Option<usize> {
        self.levels.get(&hundredths(score)).copied()
    }

    /// `(score, level)` pairs from the highest score down.
    pub fn entries(&self) -> Vec<(f32, usize)> {
        self.levels
            .iter()
            .rev()
            .map(|(&key, &level)| (from_hundredths(key), level))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Cluster distinct scores into levels 1, 2, 3, ...
///
/// The highest score is level 1. Walking down the sorted distinct scores, a
/// gap larger than `tolerance` opens a new level; smaller gaps share the
/// previous score's level.
pub fn cluster_levels(scores: &[f32], tolerance: f32) -> LevelMap {
    let mut distinct: Vec<i64> = scores.iter().map(|&s| hundredths(s)).collect();
    distinct.sort_unstable_by(|a, b| b.cmp(a));
    distinct.dedup();

    let tolerance = hundredths(tolerance);
    let mut levels = BTreeMap::new();
    let mut level = 1;
    let mut prev: Option<i64> = None;

    for key in distinct {
        if let Some(p) = prev {
            if p - key > tolerance {
                level += 1;
            }
        }
        levels.insert(key, level);
        prev = Some(key);
    }

    LevelMap { levels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_empty() {
        assert!(cluster_levels(&[], 0.5).is_empty());
    }

    #[test]
    fn test_cluster_distinct_sizes() {
        let map = cluster_levels(&[24.0, 18.0, 14.0, 18.0], 0.5);
        assert_eq!(map.level_of(24.0), Some(1));
        assert_eq!(map.level_of(18.0), Some(2));
        assert_eq!(map.level_of(14.0), Some(3));
        assert_eq!(map.level_of(12.0), None);
    }

    #[test]
    fn test_cluster_absorbs_jitter() {
        let map = cluster_levels(&[18.0, 17.7, 17.4, 12.0], 0.5);
        assert_eq!(map.level_of(18.0), Some(1));
        assert_eq!(map.level_of(17.7), Some(1));
        // Each step is 0.3, so the chain stays on one level.
        assert_eq!(map.level_of(17.4), Some(1));
        assert_eq!(map.level_of(12.0), Some(2));
    }

    #[test]
    fn test_cluster_gap_of_exactly_tolerance_shares_level() {
        let map = cluster_levels(&[16.0, 15.5], 0.5);
        assert_eq!(map.level_of(15.5), Some(1));

        let map = cluster_levels(&[16.0, 15.49], 0.5);
        assert_eq!(map.level_of(15.49), Some(2));
    }

    #[test]
    fn test_entries_descending() {
        let map = cluster_levels(&[12.0, 20.0, 16.0], 0.5);
        assert_eq!(map.entries(), vec![(20.0, 1), (16.0, 2), (12.0, 3)]);
    }
}
