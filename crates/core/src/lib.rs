//! Core library for pdftoc
//!
//! This crate implements the **Functional Core** of the pdftoc application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`pdftoc_core`** (this crate): heading detection and TOC transforms
//!   with zero I/O
//! - **`pdf`**: the `lopdf` layer that extracts styled spans and writes
//!   outlines
//! - **`pdftoc`**: the command line (the Imperative Shell)
//!
//! Every function here is deterministic: the same spans and config always
//! produce the same headings. Nothing logs; callers that want diagnostics
//! use [`detect::analyze`] and render the returned [`Detection`].
//!
//! # Module Organization
//!
//! - [`detect`]: the heading-detection pipeline
//! - [`toc_text`]: the human-editable TOC text format
//! - [`outline`]: validation of headings against a document before writing
//! - [`config`]: heuristic thresholds
//! - [`types`]: spans, headings, and outline entries

pub mod config;
pub mod detect;
pub mod outline;
pub mod toc_text;
pub mod types;

pub use config::{ConfigError, DetectConfig, NOMINAL_PAGE_HEIGHT};
pub use detect::{analyze, detect_headings, Detection};
pub use outline::{validate_outline, OutlineError};
pub use toc_text::{format_toc, parse_toc, TocParseError};
pub use types::{BBox, Candidate, Heading, OutlineEntry, Span};
