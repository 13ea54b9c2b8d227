//! Styled span extraction from page content streams.
//!
//! Walks each page's content stream with a small text-rendering state
//! machine and emits one [`Span`] per shown string (a whole `TJ` array
//! counts as one string). Positions go through the text matrix and the
//! current transformation matrix, then flip to top-down page coordinates.
//!
//! ```text
//! content ops  ->  RawSpan[]  ->  Span[]
//!   (per page)      interpret      clean text, page geometry
//! ```

use log::{debug, warn};
use pdftoc_core::{BBox, Span, NOMINAL_PAGE_HEIGHT};

use super::backend::{
    decode_text_simple, get_number_from_value, BackendFontInfo, PageId, PdfBackend, PdfValue,
};
use super::text::clean_span_text;
use crate::PdfError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Approximate glyph advance as a fraction of font size. Widths arrays are
/// not consulted.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Portion of the font size above the baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Portion of the font size below the baseline.
const DESCENT_RATIO: f32 = 0.2;

/// Descriptor weights at or above this count as bold (600 is semibold).
const BOLD_WEIGHT: f32 = 600.0;

/// Case-insensitive base-font name markers for heavy faces. "SemiBold" and
/// "DemiBold" are covered by "BOLD".
const BOLD_MARKERS: [&str; 3] = ["BOLD", "BLACK", "HEAVY"];

/// The identity matrix: [a, b, c, d, e, f].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

// ---------------------------------------------------------------------------
// Internal types
// ---------------------------------------------------------------------------

/// A shown string in PDF user space (origin bottom-left).
#[derive(Debug, Clone)]
struct RawSpan {
    text: String,
    x: f32,
    baseline: f32,
    width: f32,
    size: f32,
    font: String,
    bold: bool,
}

/// `m * n` for PDF affine matrices in row-vector form.
fn multiply(m: &[f32; 6], n: &[f32; 6]) -> [f32; 6] {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn matrix_from_operands(operands: &[PdfValue]) -> Option<[f32; 6]> {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    match vals.as_slice() {
        &[a, b, c, d, e, f] => Some([a, b, c, d, e, f]),
        _ => None,
    }
}

/// Text and graphics state tracked while walking one page.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    bold: bool,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    ctm: [f32; 6],
    /// Saved CTMs for `q` / `Q`.
    ctm_stack: Vec<[f32; 6]>,
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            bold: false,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            ctm: IDENTITY_MATRIX,
            ctm_stack: Vec::new(),
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Text space to user space.
    fn rendering_matrix(&self) -> [f32; 6] {
        multiply(&self.text_matrix, &self.ctm)
    }

    /// Current glyph origin in user space, including text rise.
    fn origin(&self) -> (f32, f32) {
        let m = self.rendering_matrix();
        (
            m[4] + m[2] * self.text_rise,
            m[5] + m[3] * self.text_rise,
        )
    }

    /// Rendered font size: the vertical scale of the rendering matrix.
    fn effective_font_size(&self) -> f32 {
        let m = self.rendering_matrix();
        (self.font_size * (m[2].powi(2) + m[3].powi(2)).sqrt()).abs()
    }

    fn estimate_width(&self, text: &str) -> f32 {
        let m = self.rendering_matrix();
        let x_scale = (m[0].powi(2) + m[1].powi(2)).sqrt();
        let n = text.chars().count() as f32;
        n * self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale * x_scale
    }

    /// Move along the text baseline by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// `Td`: translate the line matrix and restart the text matrix from it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    fn set_font(&mut self, key: Vec<u8>, info: Option<&BackendFontInfo>, size: f32) {
        self.font_name = match info.and_then(|i| i.base_font.as_deref()) {
            Some(base) => base.to_string(),
            None => String::from_utf8_lossy(&key).into_owned(),
        };
        self.bold = is_bold_font(&self.font_name, info);
        self.font_key = key;
        self.font_size = size;
    }

    /// Advance past `text` as if it had been painted.
    fn advance_after_show(&mut self, text: &str) {
        let glyph = self.font_size * APPROX_CHAR_WIDTH_RATIO;
        let dx: f32 = text
            .chars()
            .map(|c| {
                let word = if c == ' ' { self.word_spacing } else { 0.0 };
                (glyph + self.char_spacing + word) * self.horiz_scale
            })
            .sum();
        self.advance_x(dx);
    }

    fn raw_span(&self, text: String, x: f32, baseline: f32) -> RawSpan {
        RawSpan {
            width: self.estimate_width(&text),
            text,
            x,
            baseline,
            size: self.effective_font_size(),
            font: self.font_name.clone(),
            bold: self.bold,
        }
    }
}

/// Whether a font renders heavy: by base-font name, descriptor weight, or
/// the ForceBold flag.
pub fn is_bold_font(base_font: &str, info: Option<&BackendFontInfo>) -> bool {
    let upper = base_font.to_uppercase();
    if BOLD_MARKERS.iter().any(|marker| upper.contains(marker)) {
        return true;
    }
    info.is_some_and(|i| i.force_bold || i.weight.is_some_and(|w| w >= BOLD_WEIGHT))
}

fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = backend.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                decode_text_simple(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Content-stream interpretation
// ---------------------------------------------------------------------------

/// Interpret one page's content stream into raw spans.
///
/// | Operator            | Action |
/// |---------------------|--------|
/// | `q` / `Q` / `cm`    | Save, restore, concatenate the CTM |
/// | `BT`                | Reset text and line matrices |
/// | `Tf`                | Set font and size |
/// | `Tm` / `Td` / `TD` / `T*` | Position text |
/// | `TL` `Tc` `Tw` `Tz` `Ts`  | Text state parameters |
/// | `Tj` / `TJ` / `'` / `"`   | Show text |
fn interpret_page(backend: &dyn PdfBackend, page_id: PageId) -> Result<Vec<RawSpan>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut spans = Vec::new();

    for op in &ops {
        let number = |i: usize| op.operands.get(i).and_then(get_number_from_value);

        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_from_operands(&op.operands) {
                    state.ctm = multiply(&m, &state.ctm);
                }
            }

            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {}

            "Tf" => {
                let key = match op.operands.first() {
                    Some(PdfValue::Name(n)) | Some(PdfValue::Str(n)) => n.clone(),
                    _ => continue,
                };
                let info = fonts.iter().find(|f| f.name == key);
                state.set_font(key, info, number(1).unwrap_or(0.0));
            }

            "Tm" => {
                if let Some(m) = matrix_from_operands(&op.operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(0), number(1)) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(0), number(1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => state.leading = number(0).unwrap_or(state.leading),
            "Tc" => state.char_spacing = number(0).unwrap_or(state.char_spacing),
            "Tw" => state.word_spacing = number(0).unwrap_or(state.word_spacing),
            "Tz" => {
                if let Some(v) = number(0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => state.text_rise = number(0).unwrap_or(state.text_rise),

            "Tj" => {
                if let Some(first) = op.operands.first() {
                    show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    show_tj_array(arr, backend, page_id, &mut state, &mut spans);
                }
            }
            "'" => {
                state.next_line();
                if let Some(first) = op.operands.first() {
                    show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = number(0) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = number(1) {
                        state.char_spacing = ac;
                    }
                    state.next_line();
                    show_string(&op.operands[2], backend, page_id, &mut state, &mut spans);
                }
            }

            _ => {}
        }
    }

    Ok(spans)
}

fn show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<RawSpan>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let (x, baseline) = state.origin();
    state.advance_after_show(&text);
    spans.push(state.raw_span(text, x, baseline));
}

/// A `TJ` array becomes one span. Kerning gaps wider than a fraction of a
/// glyph are read as word spaces.
fn show_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<RawSpan>,
) {
    let mut buf = String::new();
    let (mut x, mut baseline) = state.origin();

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    (x, baseline) = state.origin();
                }
                buf.push_str(&fragment);
                state.advance_after_show(&fragment);
            }
            val => {
                // Thousandths of a text-space unit; negative moves right.
                if let Some(adj) = get_number_from_value(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap && !buf.is_empty() && !buf.ends_with(' ') {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    let text = buf.trim_end();
    if !text.is_empty() {
        spans.push(state.raw_span(text.to_string(), x, baseline));
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Round a size to two decimals.
fn round_size(size: f32) -> f32 {
    (size * 100.0).round() / 100.0
}

/// Turn a raw span into a page span with cleaned text and a top-down box.
/// `None` when nothing visible is left.
/// `page_top` is the upper edge of the MediaBox in user space.
fn to_page_span(raw: RawSpan, page: usize, page_top: f32) -> Option<Span> {
    let text = clean_span_text(&raw.text);
    if text.is_empty() || raw.size <= 0.0 {
        return None;
    }
    let top = raw.baseline + ASCENT_RATIO * raw.size;
    let bottom = raw.baseline - DESCENT_RATIO * raw.size;
    Some(Span {
        text,
        size: round_size(raw.size),
        bold: raw.bold,
        font: raw.font,
        bbox: BBox::new(raw.x, page_top - top, raw.x + raw.width, page_top - bottom),
        page,
    })
}

/// Bottom edge and height of a page, falling back to a nominal A4 page
/// with its origin at zero.
fn page_extent(backend: &dyn PdfBackend, page_id: PageId) -> (f32, f32) {
    match backend.media_box(page_id) {
        Ok([_, y0, _, y1]) if y1 > y0 => (y0, y1 - y0),
        Ok(_) => (0.0, NOMINAL_PAGE_HEIGHT),
        Err(e) => {
            warn!("page {:?}: {}; assuming {} pt height", page_id, e, NOMINAL_PAGE_HEIGHT);
            (0.0, NOMINAL_PAGE_HEIGHT)
        }
    }
}

/// Page height in points, falling back to the nominal A4 height.
pub fn page_height(backend: &dyn PdfBackend, page_id: PageId) -> f32 {
    page_extent(backend, page_id).1
}

/// Extract the spans of one page. `page` is the 0-based index stamped on
/// every span.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page: usize,
    page_id: PageId,
) -> Result<Vec<Span>, PdfError> {
    let (bottom, height) = page_extent(backend, page_id);
    let raw = interpret_page(backend, page_id)?;
    Ok(raw
        .into_iter()
        .filter_map(|r| to_page_span(r, page, bottom + height))
        .collect())
}

/// Extract spans from every page, in page order.
///
/// A page whose content stream cannot be read contributes no spans.
pub fn extract_all_pages(backend: &dyn PdfBackend) -> Vec<Span> {
    let mut spans = Vec::new();
    for (index, (&number, &page_id)) in backend.pages().iter().enumerate() {
        match extract_page_spans(backend, index, page_id) {
            Ok(page_spans) => {
                debug!("page {}: {} spans", number, page_spans.len());
                spans.extend(page_spans);
            }
            Err(e) => warn!("page {}: skipping unreadable content: {}", number, e),
        }
    }
    spans
}

/// Heights of every page, in page order.
pub fn page_heights(backend: &dyn PdfBackend) -> Vec<f32> {
    backend
        .pages()
        .values()
        .map(|&page_id| page_height(backend, page_id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
