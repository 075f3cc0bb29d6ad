//! Text wrapping and normalization utilities for YAML output.

use regex::Regex;
use std::sync::LazyLock;
use textwrap::{fill, Options};

use crate::config::TEXT_WRAP_WIDTH;

/// Regex matching runs of spaces or tabs left behind by PDF layout extraction.
/// A lone tab counts as a run too; it still has to become a single space.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

/// Normalize extraction artifacts in provision text.
///
/// Collapses runs of spaces and tabs into a single space. Column-aligned
/// PDF layouts leave these behind and they survive into section bodies.
pub fn normalize_text(text: &str) -> String {
    let collapsed = REPEATED_SPACES.replace_all(text, " ");
    collapsed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap text at the specified width, preserving paragraph breaks.
pub fn wrap_text(text: &str, width: usize) -> String {
    let options = Options::new(width);
    text.split("\n\n")
        .map(|p| fill(p, &options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Check if text should be wrapped for readability.
pub fn should_wrap_text(text: &str) -> bool {
    text.lines().any(|line| line.chars().count() > TEXT_WRAP_WIDTH)
}

/// Wrap text with the default width.
pub fn wrap_text_default(text: &str) -> String {
    wrap_text(text, TEXT_WRAP_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_text_simple() {
        let text = "This is a simple text that should be wrapped when it exceeds the specified width limit.";
        let wrapped = wrap_text(text, 40);
        assert!(wrapped.contains('\n'));
    }

    #[test]
    fn test_wrap_text_preserves_paragraphs() {
        let text = "First paragraph.\n\nSecond paragraph.";
        let wrapped = wrap_text(text, 100);
        assert!(wrapped.contains("\n\n"));
    }

    #[test]
    fn test_should_wrap_text_long() {
        let long_line = "अ".repeat(120);
        assert!(should_wrap_text(&long_line));
    }

    #[test]
    fn test_should_wrap_text_short() {
        assert!(!should_wrap_text("छोटो पाठ"));
    }

    #[test]
    fn test_should_wrap_counts_chars_not_bytes() {
        // 90 Devanagari chars is 270 bytes but still under the width
        let line = "क".repeat(90);
        assert!(!should_wrap_text(&line));
    }

    #[test]
    fn test_normalize_text_collapses_spaces() {
        assert_eq!(
            normalize_text("दफा १.    चोरीको   परिभाषा"),
            "दफा १. चोरीको परिभाषा"
        );
        assert_eq!(normalize_text("a\tb"), "a b");
        assert_eq!(normalize_text("a \t b"), "a b");
    }

    #[test]
    fn test_normalize_text_trims_line_ends() {
        assert_eq!(normalize_text("line one   \nline two"), "line one\nline two");
    }

    #[test]
    fn test_normalize_text_preserves_single_spaces() {
        assert_eq!(normalize_text("already clean text"), "already clean text");
    }
}
