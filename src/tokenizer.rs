//! Line-by-line structural tokenizer.
//!
//! Scans normalized document text and classifies every non-empty line as a
//! structural marker or body text, using the ordered
//! [`MarkerPatternSet`](crate::patterns::MarkerPatternSet). This stage never
//! fails: unrecognized structure simply degrades to body tokens, which is
//! exactly the signal the fallback trigger is derived from.

use crate::patterns::MarkerPatternSet;
use crate::types::Tier;

/// One classified line of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification of the line.
    pub tier: Tier,

    /// Declared number for structural tiers, `None` for body text.
    pub number: Option<String>,

    /// Marker-trailing title text, or the whole trimmed line for body text.
    pub text: String,

    /// Byte offset of the line start in the source text.
    ///
    /// Retained so citations can be traced back to the original document
    /// position during debugging and audit.
    pub offset: usize,
}

/// Lazy token iterator over document lines.
///
/// Empty lines are skipped; everything else yields exactly one token.
pub struct Tokens<'a> {
    remaining: &'a str,
    offset: usize,
    patterns: &'a MarkerPatternSet,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.remaining.is_empty() {
                return None;
            }

            let (line, consumed) = match self.remaining.find('\n') {
                Some(idx) => (&self.remaining[..idx], idx + 1),
                None => (self.remaining, self.remaining.len()),
            };
            let line_offset = self.offset;
            self.remaining = &self.remaining[consumed..];
            self.offset += consumed;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let token = match self.patterns.classify(trimmed) {
                Some(marker) => Token {
                    tier: marker.tier,
                    number: Some(marker.number),
                    text: marker.rest,
                    offset: line_offset,
                },
                None => Token {
                    tier: Tier::Body,
                    number: None,
                    text: trimmed.to_string(),
                    offset: line_offset,
                },
            };
            return Some(token);
        }
    }
}

/// Tokenize normalized document text against a marker pattern table.
#[must_use]
pub fn tokenize<'a>(text: &'a str, patterns: &'a MarkerPatternSet) -> Tokens<'a> {
    Tokens {
        remaining: text,
        offset: 0,
        patterns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(text: &str) -> Vec<Token> {
        let patterns = MarkerPatternSet::nepali();
        tokenize(text, &patterns).collect()
    }

    #[test]
    fn test_tokenize_mixed_document() {
        let text = "भाग १\nपरिच्छेद १ — General\nदफा १. Theft.\nWhoever commits theft...\n";
        let tokens = collect(text);

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].tier, Tier::Part);
        assert_eq!(tokens[0].number.as_deref(), Some("1"));
        assert_eq!(tokens[1].tier, Tier::Chapter);
        assert_eq!(tokens[1].text, "General");
        assert_eq!(tokens[2].tier, Tier::Section);
        assert_eq!(tokens[2].text, "Theft.");
        assert_eq!(tokens[3].tier, Tier::Body);
        assert_eq!(tokens[3].text, "Whoever commits theft...");
    }

    #[test]
    fn test_tokenize_skips_blank_lines() {
        let tokens = collect("दफा १\n\n\nbody text\n\n");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_tokenize_offsets_point_at_line_starts() {
        let text = "भाग १\nbody\n";
        let tokens = collect(text);

        assert_eq!(tokens[0].offset, 0);
        // Second line starts after "भाग १\n" (Devanagari chars are 3 bytes)
        assert_eq!(tokens[1].offset, "भाग १\n".len());
        assert_eq!(&text[tokens[1].offset..tokens[1].offset + 4], "body");
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(collect("").is_empty());
        assert!(collect("\n\n  \n").is_empty());
    }

    #[test]
    fn test_tokenize_pure_prose_is_all_body() {
        let tokens = collect("This document has no markers.\nJust prose lines.\n");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.tier == Tier::Body));
        assert!(tokens.iter().all(|t| t.number.is_none()));
    }

    #[test]
    fn test_tokenize_is_restartable() {
        let patterns = MarkerPatternSet::nepali();
        let text = "दफा १\nbody\n";

        let first: Vec<_> = tokenize(text, &patterns).collect();
        let second: Vec<_> = tokenize(text, &patterns).collect();
        assert_eq!(first, second);
    }
}
