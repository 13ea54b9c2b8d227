//! Tuning surface for the heading-detection heuristics.
//!
//! Every statistical threshold the pipeline uses lives in [`DetectConfig`].
//! The defaults reproduce the stock behaviour; a TOML file can override any
//! subset of fields:
//!
//! ```toml
//! max_level = 3
//! line_merge_tolerance = 3.0
//! use_actual_page_height = true
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nominal page height (A4, in points) used for the header/footer zones.
pub const NOMINAL_PAGE_HEIGHT: f32 = 842.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectConfig {
    /// Deepest heading level kept in the output.
    pub max_level: usize,
    /// Fraction of the page height at the top and bottom treated as the
    /// header/footer zone.
    pub zone_fraction: f32,
    /// Share of pages a zone text must appear on to count as recurring.
    pub recurrence_threshold: f32,
    /// Lower bound on the recurrence count, whatever the page count.
    pub min_recurrence_count: usize,
    /// Documents shorter than this never have recurring text.
    pub min_recurring_pages: usize,
    /// Distinct scores closer than this share a level.
    pub score_merge_tolerance: f32,
    /// Candidates whose vertical centers differ by less than this are one line.
    pub line_merge_tolerance: f32,
    /// Page height used for the zones when actual heights are not used.
    pub page_height: f32,
    /// Use per-page heights from the document instead of `page_height`.
    pub use_actual_page_height: bool,
    /// Score bonus for bold text.
    pub bold_bonus: f32,
    /// Shorter candidates are dropped unless they start with a digit.
    pub min_heading_chars: usize,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            max_level: 6,
            zone_fraction: 0.08,
            recurrence_threshold: 0.3,
            min_recurrence_count: 2,
            min_recurring_pages: 3,
            score_merge_tolerance: 0.5,
            line_merge_tolerance: 2.0,
            page_height: NOMINAL_PAGE_HEIGHT,
            use_actual_page_height: false,
            bold_bonus: 2.0,
            min_heading_chars: 2,
        }
    }
}

impl DetectConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: DetectConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style override of `max_level`.
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(invalid("max_level", "must be at least 1"));
        }
        if !(self.zone_fraction > 0.0 && self.zone_fraction < 0.5) {
            return Err(invalid("zone_fraction", "must be in (0, 0.5)"));
        }
        if !(self.recurrence_threshold >= 0.0 && self.recurrence_threshold <= 1.0) {
            return Err(invalid("recurrence_threshold", "must be in [0, 1]"));
        }
        if self.score_merge_tolerance.is_nan() || self.score_merge_tolerance < 0.0 {
            return Err(invalid("score_merge_tolerance", "must not be negative"));
        }
        if !(self.line_merge_tolerance > 0.0) {
            return Err(invalid("line_merge_tolerance", "must be positive"));
        }
        if !(self.page_height > 0.0) {
            return Err(invalid("page_height", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
