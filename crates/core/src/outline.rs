use thiserror::Error;

use crate::types::{Heading, OutlineEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlineError {
    #[error("page {page} out of range (document has {total_pages} pages): {title:?}")]
    PageOutOfRange {
        title: String,
        /// 1-based page the heading pointed at.
        page: usize,
        total_pages: usize,
    },
    #[error("level {level} follows level {previous} (levels may only deepen by one): {title:?}")]
    LevelJump {
        title: String,
        level: usize,
        previous: usize,
    },
}

/// Check headings against the document and turn them into writer triples.
///
/// All-or-nothing: the first bad heading fails the whole outline.
pub fn validate_outline(
    headings: &[Heading],
    total_pages: usize,
) -> Result<Vec<OutlineEntry>, OutlineError> {
    let mut previous = 0;
    let mut entries = Vec::with_capacity(headings.len());

    for heading in headings {
        if heading.page >= total_pages {
            return Err(OutlineError::PageOutOfRange {
                title: heading.text.clone(),
                page: heading.page + 1,
                total_pages,
            });
        }
        if heading.level == 0 || heading.level > previous + 1 {
            return Err(OutlineError::LevelJump {
                title: heading.text.clone(),
                level: heading.level,
                previous,
            });
        }
        previous = heading.level;

        entries.push(OutlineEntry {
            level: heading.level,
            title: heading.text.clone(),
            page: u32::try_from(heading.page + 1).map_err(|_| OutlineError::PageOutOfRange {
                title: heading.text.clone(),
                page: heading.page + 1,
                total_pages,
            })?,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_converts_to_one_based_pages() {
        let entries = validate_outline(
            &[Heading::new("Intro", 1, 0), Heading::new("Body", 2, 3)],
            4,
        )
        .unwrap();
        assert_eq!(
            entries,
            vec![
                OutlineEntry {
                    level: 1,
                    title: "Intro".to_string(),
                    page: 1,
                },
                OutlineEntry {
                    level: 2,
                    title: "Body".to_string(),
                    page: 4,
                },
            ]
        );
    }

    #[test]
    fn test_validate_page_out_of_range() {
        let err = validate_outline(
            &[Heading::new("Intro", 1, 0), Heading::new("Appendix", 1, 4)],
            4,
        )
        .unwrap_err();
        assert_eq!(
            err,
            OutlineError::PageOutOfRange {
                title: "Appendix".to_string(),
                page: 5,
                total_pages: 4,
            }
        );
        assert_eq!(
            err.to_string(),
            "page 5 out of range (document has 4 pages): \"Appendix\""
        );
    }

    #[test]
    fn test_validate_rejects_level_jump() {
        let err = validate_outline(&[Heading::new("A", 1, 0), Heading::new("B", 3, 0)], 1)
            .unwrap_err();
        assert!(matches!(
            err,
            OutlineError::LevelJump {
                level: 3,
                previous: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_first_must_be_level_one() {
        let err = validate_outline(&[Heading::new("Sub", 2, 0)], 1).unwrap_err();
        assert!(matches!(err, OutlineError::LevelJump { previous: 0, .. }));
    }

    #[test]
    fn test_validate_allows_climbing_back_up() {
        let headings = vec![
            Heading::new("A", 1, 0),
            Heading::new("A.1", 2, 0),
            Heading::new("A.1.a", 3, 0),
            Heading::new("B", 1, 0),
        ];
        assert_eq!(validate_outline(&headings, 1).unwrap().len(), 4);
    }

    #[test]
    fn test_validate_empty() {
        assert!(validate_outline(&[], 0).unwrap().is_empty());
    }
}
