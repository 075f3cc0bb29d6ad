//! Declarative marker pattern table.
//!
//! Each structural tier is recognized by an anchored regex over a line of
//! normalized text. The table is ordered most specific first
//! (Clause → SubSection → Section → Chapter → Part) so a short marker word
//! is never swallowed by a longer one, and it is configuration rather than
//! code: new document families are supported by adding table entries.

use regex::Regex;

use crate::error::{IngestError, Result};
use crate::numerals::normalize_numerals;
use crate::types::Tier;

/// Characters that separate a marker from its trailing title text.
const TITLE_SEPARATORS: &[char] = &[' ', '\t', '—', '–', '-', ':', '।', '.', ','];

/// A single tier recognizer: anchored regex with one number capture group.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    /// Tier this pattern recognizes.
    pub tier: Tier,

    /// Anchored regex; group 1 captures the declared number or letter.
    regex: Regex,
}

impl MarkerPattern {
    /// Compile a marker pattern.
    ///
    /// # Errors
    /// Returns `IngestError::InvalidPattern` when the regex does not compile.
    pub fn new(tier: Tier, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| IngestError::InvalidPattern {
            tier: tier.to_string(),
            source,
        })?;
        Ok(Self { tier, regex })
    }
}

/// A classified marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// The recognized tier.
    pub tier: Tier,

    /// Declared number, with Devanagari digits normalized to ASCII.
    pub number: String,

    /// Text trailing the marker on the same line, separators stripped.
    pub rest: String,
}

/// Ordered table of marker patterns for one document locale.
#[derive(Debug, Clone)]
pub struct MarkerPatternSet {
    patterns: Vec<MarkerPattern>,
}

impl MarkerPatternSet {
    /// Build a pattern set from an ordered list of (tier, regex) pairs.
    ///
    /// Order matters: the first matching pattern wins, so callers list the
    /// most specific tier first.
    ///
    /// # Errors
    /// Returns `IngestError::InvalidPattern` for the first pattern that does
    /// not compile.
    pub fn from_patterns(patterns: &[(Tier, &str)]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|(tier, pattern)| MarkerPattern::new(*tier, pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Default pattern table for Nepal Law Commission documents.
    ///
    /// Recognizes, most specific first:
    /// - Clause: `खण्ड (क)` / bare `(क)` — Devanagari or Latin letter marker
    /// - SubSection: `उपदफा १` / bare `(१)` — digit marker
    /// - Section: `दफा १` or `धारा १`
    /// - Chapter: `परिच्छेद १`
    /// - Part: `भाग १`
    ///
    /// Digit classes accept Devanagari digits as well, so classification
    /// still works if a caller skips numeral normalization.
    #[must_use]
    #[allow(clippy::expect_used)] // Static patterns that are guaranteed to be valid
    pub fn nepali() -> Self {
        Self::from_patterns(&[
            (
                Tier::Clause,
                r"^खण्ड[\s-]*[\(（]?([०-९0-9]+|[क-ज्ञa-z])[\)）]?[\s:।.]*",
            ),
            (Tier::Clause, r"^[\(（]([क-ज्ञa-z])[\)）][\s:।.]*"),
            (Tier::SubSection, r"^उपदफा[\s-]*([०-९0-9]+)[\s:।.]*"),
            (Tier::SubSection, r"^[\(（]([०-९0-9]+)[\)）][\s:।.]*"),
            (Tier::Section, r"^(?:दफा|धारा)[\s-]*([०-९0-9]+)[\s:।.]*"),
            (Tier::Chapter, r"^परिच्छेद[\s-]*([०-९0-9]+)[\s:।.]*"),
            (Tier::Part, r"^भाग[\s-]*([०-९0-9]+)[\s:।.]*"),
        ])
        .expect("static patterns compile")
    }

    /// Classify a single line.
    ///
    /// Returns the first matching tier's marker, or `None` for body text.
    /// Never fails; a line no pattern recognizes is simply not a marker.
    #[must_use]
    pub fn classify(&self, line: &str) -> Option<MarkerMatch> {
        let trimmed = line.trim();
        for pattern in &self.patterns {
            if let Some(caps) = pattern.regex.captures(trimmed) {
                let number = caps
                    .get(1)
                    .map(|m| normalize_numerals(m.as_str()))
                    .unwrap_or_default();
                let end = caps.get(0).map_or(0, |m| m.end());
                let rest = trimmed[end..]
                    .trim_start_matches(TITLE_SEPARATORS)
                    .trim_end()
                    .to_string();
                return Some(MarkerMatch {
                    tier: pattern.tier,
                    number,
                    rest,
                });
            }
        }
        None
    }

    /// Number of patterns in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for MarkerPatternSet {
    fn default() -> Self {
        Self::nepali()
    }
}
