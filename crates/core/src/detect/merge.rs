use crate::types::Candidate;

/// Merge consecutive candidates that sit on the same visual line.
///
/// Two candidates belong together when they are on the same page and their
/// vertical centers differ by less than `tolerance` points. Only the last
/// accumulated record is ever extended, so runs of three or more chain left
/// to right.
pub fn merge_same_line(candidates: Vec<Candidate>, tolerance: f32) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if let Some(prev) = merged.last_mut() {
            let same_line = candidate.page == prev.page
                && (candidate.bbox.center_y() - prev.bbox.center_y()).abs() < tolerance;

            if same_line {
                prev.text.push(' ');
                prev.text.push_str(&candidate.text);
                prev.bbox = prev.bbox.union(&candidate.bbox);
                continue;
            }
        }

        merged.push(candidate);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BBox;

    fn make_candidate(text: &str, x0: f32, y0: f32, y1: f32, page: usize) -> Candidate {
        Candidate {
            text: text.to_string(),
            size: 18.0,
            bold: true,
            score: 20.0,
            bbox: BBox::new(x0, y0, x0 + 40.0, y1),
            page,
        }
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_same_line(vec![], 2.0).is_empty());
    }

    #[test]
    fn test_merge_close_centers() {
        // Centers 110.0 and 111.0: one point apart.
        let merged = merge_same_line(
            vec![
                make_candidate("2.1", 72.0, 100.0, 120.0, 2),
                make_candidate("Scope", 100.0, 101.0, 121.0, 2),
            ],
            2.0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "2.1 Scope");
        assert_eq!(merged[0].bbox, BBox::new(72.0, 100.0, 140.0, 121.0));
        assert_eq!(merged[0].page, 2);
    }

    #[test]
    fn test_merge_chains_three_fragments() {
        let merged = merge_same_line(
            vec![
                make_candidate("Part", 72.0, 100.0, 120.0, 0),
                make_candidate("One:", 120.0, 100.5, 120.5, 0),
                make_candidate("Basics", 170.0, 101.0, 121.0, 0),
            ],
            2.0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Part One: Basics");
    }

    #[test]
    fn test_no_merge_across_pages() {
        let merged = merge_same_line(
            vec![
                make_candidate("End", 72.0, 100.0, 120.0, 0),
                make_candidate("Start", 72.0, 100.0, 120.0, 1),
            ],
            2.0,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_no_merge_at_tolerance() {
        // Exactly 2.0 apart is not "less than" the tolerance.
        let merged = merge_same_line(
            vec![
                make_candidate("First", 72.0, 100.0, 120.0, 0),
                make_candidate("Second", 72.0, 102.0, 122.0, 0),
            ],
            2.0,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_only_with_previous_record() {
        // B is far from A, C is close to A but only compared against B.
        let merged = merge_same_line(
            vec![
                make_candidate("A", 72.0, 100.0, 120.0, 0),
                make_candidate("B", 72.0, 300.0, 320.0, 0),
                make_candidate("C", 72.0, 100.5, 120.5, 0),
            ],
            2.0,
        );
        let texts: Vec<&str> = merged.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }
}
