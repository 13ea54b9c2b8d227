use crate::types::Heading;

/// Rewrite raw cluster levels so the sequence never skips a level.
///
/// A stack holds the raw levels on the current nesting path. Each heading
/// closes every open entry at its own raw level or deeper, then lands one
/// below whatever remains open.
pub fn fix_level_gaps(headings: Vec<Heading>) -> Vec<Heading> {
    let mut stack: Vec<usize> = Vec::new();
    let mut fixed = Vec::with_capacity(headings.len());

    for heading in headings {
        while stack.last().is_some_and(|&top| top >= heading.level) {
            stack.pop();
        }
        let level = stack.len() + 1;
        stack.push(heading.level);
        fixed.push(Heading { level, ..heading });
    }

    fixed
}

/// Whether `headings` starts at level 1 and never jumps more than one level
/// below the deepest level seen so far.
pub fn is_densely_nested(headings: &[Heading]) -> bool {
    let mut max_seen = 0;
    for heading in headings {
        if heading.level == 0 || heading.level > max_seen + 1 {
            return false;
        }
        max_seen = max_seen.max(heading.level);
    }
    true
}
