use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-down page space: `(x0, y0)` is the
/// top-left corner, `(x1, y1)` the bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A styled run of text as emitted by the span source, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    /// Font size in points, rounded to two decimals.
    pub size: f32,
    pub bold: bool,
    pub font: String,
    pub bbox: BBox,
    /// 0-based page index.
    pub page: usize,
}

/// A detected (or imported) table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    /// 1-based nesting level.
    pub level: usize,
    /// 0-based page index.
    pub page: usize,
}

impl Heading {
    pub fn new(text: impl Into<String>, level: usize, page: usize) -> Self {
        Heading {
            text: text.into(),
            level,
            page,
        }
    }
}

/// Working record for a heading candidate. Line merging extends `text` and
/// `bbox` in place; candidates are never reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub score: f32,
    pub bbox: BBox,
    pub page: usize,
}

/// A validated outline entry ready for the bookmark writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: usize,
    pub title: String,
    /// 1-based page number, guaranteed to be within the document.
    pub page: u32,
}

/// Convert a point value to integer hundredths, the resolution at which font
/// sizes and scores are compared.
pub fn hundredths(value: f32) -> i64 {
    (f64::from(value) * 100.0).round() as i64
}

/// Inverse of [`hundredths`].
pub fn from_hundredths(key: i64) -> f32 {
    (key as f64 / 100.0) as f32
}
