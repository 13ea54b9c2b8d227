//! Human-editable TOC text format.
//!
//! One heading per line, two spaces of indentation per level below the
//! first, and a 1-based page marker after at least two spaces:
//!
//! ```text
//! Introduction  (p. 1)
//!   Motivation  (p. 2)
//!     Prior work  (p. 3)
//! Method  (p. 5)
//! ```

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::types::Heading;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TocParseError {
    #[error("malformed TOC line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("odd indentation ({spaces} spaces) on line {line}: {content:?}")]
    OddIndentation {
        line: usize,
        spaces: usize,
        content: String,
    },
    #[error("page numbers start at 1 on line {line}: {content:?}")]
    InvalidPage { line: usize, content: String },
}

impl TocParseError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            TocParseError::MalformedLine { line, .. }
            | TocParseError::OddIndentation { line, .. }
            | TocParseError::InvalidPage { line, .. } => *line,
        }
    }
}

/// Render headings in the editable text format, one line each.
pub fn format_toc(headings: &[Heading]) -> String {
    let mut out = String::new();
    for heading in headings {
        let indent = "  ".repeat(heading.level.saturating_sub(1));
        out.push_str(&format!(
            "{}{}  (p. {})\n",
            indent,
            heading.text,
            heading.page + 1
        ));
    }
    out
}

/// Parse the editable text format back into headings.
///
/// Blank lines are ignored. Any malformed line rejects the whole input.
pub fn parse_toc(text: &str) -> Result<Vec<Heading>, TocParseError> {
    static RE_LINE: OnceLock<Regex> = OnceLock::new();
    let re = RE_LINE.get_or_init(|| Regex::new(r"^( *)(.*?)\s{2,}\(p\.\s*(\d+)\)\s*$").unwrap());

    let mut headings = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let caps = re
            .captures(line)
            .ok_or_else(|| TocParseError::MalformedLine {
                line: lineno,
                content: line.to_string(),
            })?;

        let spaces = caps[1].len();
        if spaces % 2 != 0 {
            return Err(TocParseError::OddIndentation {
                line: lineno,
                spaces,
                content: line.to_string(),
            });
        }

        // Digits that overflow are as unusable as a missing page marker.
        let page: usize = caps[3].parse().map_err(|_| TocParseError::MalformedLine {
            line: lineno,
            content: line.to_string(),
        })?;
        let page = page.checked_sub(1).ok_or_else(|| TocParseError::InvalidPage {
            line: lineno,
            content: line.to_string(),
        })?;

        headings.push(Heading {
            text: caps[2].trim().to_string(),
            level: spaces / 2 + 1,
            page,
        });
    }

    Ok(headings)
}
