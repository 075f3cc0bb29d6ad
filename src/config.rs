//! Configuration surface and validation for the parsing core.

use crate::error::{IngestError, Result};

/// Default chunk size threshold in characters.
///
/// A Section whose total content (own text plus all descendants) exceeds
/// this length is emitted as one chunk per SubSection instead of a single
/// section chunk. 2000 characters keeps chunks comfortably inside typical
/// embedding-model context windows.
pub const DEFAULT_CHUNK_SIZE_THRESHOLD: usize = 2000;

/// Default minimum fraction of structural tokens relative to total lines.
///
/// Below this fraction the builder reports insufficient structure, which
/// triggers the single fallback extraction attempt. Real acts sit well above
/// this; a layout-mangled PDF extraction sits near zero.
pub const DEFAULT_MIN_STRUCTURAL_FRACTION: f64 = 0.05;

/// Text wrap width for YAML output.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Tuning knobs consumed by the parsing core.
///
/// The marker pattern table is configured separately via
/// [`crate::patterns::MarkerPatternSet`] since it is per-locale rather than
/// per-run.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Section size above which chunks are emitted per SubSection.
    pub chunk_size_threshold: usize,

    /// Minimum structural-token fraction before fallback triggers.
    pub min_structural_fraction: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            chunk_size_threshold: DEFAULT_CHUNK_SIZE_THRESHOLD,
            min_structural_fraction: DEFAULT_MIN_STRUCTURAL_FRACTION,
        }
    }
}

impl ParserConfig {
    /// Validate configuration values.
    ///
    /// # Returns
    /// * `Ok(())` if the configuration is usable
    /// * `Err(IngestError::InvalidConfig)` otherwise
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size_threshold == 0 {
            return Err(IngestError::InvalidConfig(
                "chunk_size_threshold must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_structural_fraction) {
            return Err(IngestError::InvalidConfig(format!(
                "min_structural_fraction must be within [0.0, 1.0], got {}",
                self.min_structural_fraction
            )));
        }
        Ok(())
    }

    /// Set the chunk size threshold.
    #[must_use]
    pub fn with_chunk_size_threshold(mut self, threshold: usize) -> Self {
        self.chunk_size_threshold = threshold;
        self
    }

    /// Set the minimum structural fraction.
    #[must_use]
    pub fn with_min_structural_fraction(mut self, fraction: f64) -> Self {
        self.min_structural_fraction = fraction;
        self
    }
}
