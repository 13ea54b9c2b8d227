use std::path::Path;

use log::{debug, info};
use pdftoc_core::{OutlineEntry, Span};
use thiserror::Error;

use parser::backend::LopdfBackend;

pub mod outline;
pub mod parser;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Page not found: {0}")]
    PageNotFound(u32),
    #[error("PDF write error: {0}")]
    Write(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// An opened PDF: the source of spans and the target of a new outline.
///
/// Constructed via [`PdfDocument::open`] or [`PdfDocument::from_bytes`].
/// Writing consumes the document, so one opened file produces at most one
/// output.
pub struct PdfDocument {
    backend: LopdfBackend,
}

impl PdfDocument {
    /// Read and parse a PDF file.
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    /// Parse PDF bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        Ok(Self { backend })
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Heights in points, one per page.
    pub fn page_heights(&self) -> Vec<f32> {
        parser::spans::page_heights(&self.backend)
    }

    /// Every styled text span, in page order with 0-based page indices.
    pub fn spans(&self) -> Vec<Span> {
        let spans = parser::spans::extract_all_pages(&self.backend);
        info!(
            "extracted {} spans from {} pages",
            spans.len(),
            self.page_count()
        );
        spans
    }

    /// Replace the outline with `entries` and save to `dest`.
    ///
    /// `dest` may be the file this document was opened from: its bytes are
    /// already in memory, and the file is only touched once serialization
    /// has succeeded.
    pub fn write_outline(self, entries: &[OutlineEntry], dest: &Path) -> Result<(), PdfError> {
        let mut doc = self.backend.into_inner();
        outline::replace_outline(&mut doc, entries)?;
        doc.compress();

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| PdfError::Write(format!("{}: {}", dest.display(), e)))?;
        std::fs::write(dest, &buf)?;
        info!(
            "saved {} bookmarks to {} ({} bytes)",
            entries.len(),
            dest.display(),
            buf.len()
        );
        Ok(())
    }
}
