//! Per-document parsing pipeline.
//!
//! Runs normalize → tokenize → build on the primary extraction, and when the
//! recognized structure falls below the configured fraction, retries once on
//! the alternate extraction path. The two-attempt policy is an explicit
//! state machine (primary → fallback → terminal), never a retry loop, so the
//! worst case is exactly two tokenizer passes per document.
//!
//! Each run is a pure function from (text, config) to (tree, warnings); no
//! state is shared between documents, which is what makes batch ingestion
//! embarrassingly parallel for the caller.

use unicode_normalization::UnicodeNormalization;

use crate::builder::{build_tree, BuildResult};
use crate::config::ParserConfig;
use crate::fallback::{ExtractionPath, TextExtractor};
use crate::numerals::normalize_numerals;
use crate::patterns::MarkerPatternSet;
use crate::tokenizer::tokenize;
use crate::types::{Act, DocumentInput, ParseWarning};

/// Terminal state of a document's pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// Enough structure was recognized; the tree is trustworthy.
    Parsed,

    /// Both extraction attempts fell below the structural threshold; the
    /// tree is best-effort and citations may be incomplete.
    Unparseable,

    /// The input was empty or whitespace-only; the tree is an empty Act.
    Empty,
}

/// Result of parsing one document. Never an error: every failure mode is
/// contained here so batch callers can log and move on.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Stable identifier of the source document.
    pub doc_id: String,

    /// The assembled tree (possibly partial, possibly empty).
    pub act: Act,

    /// Structural-ambiguity warnings from the kept attempt.
    pub warnings: Vec<ParseWarning>,

    /// Terminal pipeline state.
    pub status: ParseStatus,

    /// How many extraction attempts ran (0 for empty input, max 2).
    pub attempts: u8,

    /// Which extraction path produced the kept tree.
    pub path: ExtractionPath,
}

impl ParseOutcome {
    /// Whether the document needs manual or later fallback handling.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        !matches!(self.status, ParseStatus::Parsed)
    }
}

/// One normalize → tokenize → build pass over a text blob.
fn run_pass(text: &str, source_url: &str, patterns: &MarkerPatternSet) -> BuildResult {
    // NFC first so Devanagari combining sequences compare stably against
    // the marker patterns, then numeral normalization
    let text: String = text.nfc().collect();
    let text = normalize_numerals(&text);
    build_tree(tokenize(&text, patterns), source_url)
}

fn is_sufficient(result: &BuildResult, config: &ParserConfig) -> bool {
    result.stats.structural_fraction() >= config.min_structural_fraction
}

/// Parse a single document, with at most one fallback extraction attempt.
///
/// The `extractor` is only consulted when the primary text yields
/// insufficient structure; its failure is contained (the document is flagged
/// unparseable, never aborted).
#[must_use]
pub fn parse_document(
    input: &DocumentInput,
    extractor: &dyn TextExtractor,
    config: &ParserConfig,
    patterns: &MarkerPatternSet,
) -> ParseOutcome {
    if input.text.trim().is_empty() {
        tracing::warn!(doc_id = %input.doc_id, "Empty input, skipping parse");
        return finalize(
            input,
            Act::new("", &input.source_url),
            Vec::new(),
            ParseStatus::Empty,
            0,
            input.path,
        );
    }

    let primary = run_pass(&input.text, &input.source_url, patterns);
    if is_sufficient(&primary, config) {
        tracing::debug!(
            doc_id = %input.doc_id,
            sections = primary.act.section_count(),
            "Parsed on primary extraction"
        );
        return finalize(
            input,
            primary.act,
            primary.warnings,
            ParseStatus::Parsed,
            1,
            input.path,
        );
    }

    let alternate_path = input.path.alternate();
    tracing::info!(
        doc_id = %input.doc_id,
        fraction = primary.stats.structural_fraction(),
        threshold = config.min_structural_fraction,
        path = %alternate_path,
        "Insufficient structure, trying alternate extraction"
    );

    let alternate_text = match extractor.extract(&input.doc_id, alternate_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(doc_id = %input.doc_id, error = %e, "Fallback extraction failed");
            return finalize(
                input,
                primary.act,
                primary.warnings,
                ParseStatus::Unparseable,
                1,
                input.path,
            );
        }
    };

    let fallback = run_pass(&alternate_text, &input.source_url, patterns);
    if is_sufficient(&fallback, config) {
        return finalize(
            input,
            fallback.act,
            fallback.warnings,
            ParseStatus::Parsed,
            2,
            alternate_path,
        );
    }

    // Terminal: both attempts insufficient. Keep whichever attempt
    // recognized more structure; ties go to the primary.
    let (kept, kept_path) =
        if fallback.stats.structural_tokens > primary.stats.structural_tokens {
            (fallback, alternate_path)
        } else {
            (primary, input.path)
        };
    tracing::warn!(doc_id = %input.doc_id, "Document unparseable after fallback");
    finalize(
        input,
        kept.act,
        kept.warnings,
        ParseStatus::Unparseable,
        2,
        kept_path,
    )
}

fn finalize(
    input: &DocumentInput,
    mut act: Act,
    warnings: Vec<ParseWarning>,
    status: ParseStatus,
    attempts: u8,
    path: ExtractionPath,
) -> ParseOutcome {
    act.retrieved_at = input.retrieved_at;
    act.metadata
        .insert("doc_id".to_string(), input.doc_id.clone());
    act.metadata
        .insert("extraction_path".to_string(), path.as_str().to_string());

    ParseOutcome {
        doc_id: input.doc_id.clone(),
        act,
        warnings,
        status,
        attempts,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::InMemoryExtractor;
    use pretty_assertions::assert_eq;

    const STRUCTURED: &str = "चोरी ऐन, २०७४\nभाग १\nपरिच्छेद १ — General\nदफा १. Theft.\nWhoever commits theft...\n";
    const PROSE: &str = "Just some prose.\nNo markers anywhere.\nStill nothing.\n";

    fn input(text: &str) -> DocumentInput {
        DocumentInput::new(
            "test-act",
            "https://lawcommission.gov.np/test-act.pdf",
            text,
            ExtractionPath::PdfLayout,
        )
    }

    fn run(input: &DocumentInput, extractor: &InMemoryExtractor) -> ParseOutcome {
        parse_document(
            input,
            extractor,
            &ParserConfig::default(),
            &MarkerPatternSet::nepali(),
        )
    }

    #[test]
    fn test_structured_document_parses_on_primary() {
        let outcome = run(&input(STRUCTURED), &InMemoryExtractor::new());

        assert_eq!(outcome.status, ParseStatus::Parsed);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.path, ExtractionPath::PdfLayout);
        assert_eq!(outcome.act.title, "चोरी ऐन, 2074");
        assert_eq!(outcome.act.section_count(), 1);
        assert!(!outcome.needs_review());
    }

    #[test]
    fn test_empty_input_flagged_not_raised() {
        let outcome = run(&input("   \n  \n"), &InMemoryExtractor::new());

        assert_eq!(outcome.status, ParseStatus::Empty);
        assert_eq!(outcome.attempts, 0);
        assert_eq!(outcome.act.section_count(), 0);
        assert!(outcome.needs_review());
    }

    #[test]
    fn test_fallback_succeeds_on_alternate_path() {
        let extractor = InMemoryExtractor::new().with_html_rendered(STRUCTURED);
        let outcome = run(&input(PROSE), &extractor);

        assert_eq!(outcome.status, ParseStatus::Parsed);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.path, ExtractionPath::HtmlRendered);
        assert_eq!(outcome.act.section_count(), 1);
    }

    #[test]
    fn test_both_attempts_insufficient_keeps_primary_tree() {
        let extractor = InMemoryExtractor::new().with_html_rendered(PROSE);
        let outcome = run(&input(PROSE), &extractor);

        assert_eq!(outcome.status, ParseStatus::Unparseable);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.path, ExtractionPath::PdfLayout);
        // Best-effort tree still carries the prose as preamble
        assert!(outcome.act.preamble.contains("Just some prose."));
    }

    #[test]
    fn test_missing_alternate_rendition_contained() {
        let outcome = run(&input(PROSE), &InMemoryExtractor::new());

        assert_eq!(outcome.status, ParseStatus::Unparseable);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.act.preamble.contains("No markers"));
    }

    #[test]
    fn test_fallback_with_more_structure_kept_when_both_insufficient() {
        // Fallback finds one marker among many prose lines - still below the
        // threshold, but better than the primary's none
        let slightly_structured =
            "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\nm\nn\no\np\nq\nr\ns\nदफा १\n_text\na2\nb2\nc2\n";
        let mostly_prose: String = (0..40).map(|i| format!("line {i}\n")).collect();
        let extractor = InMemoryExtractor::new().with_html_rendered(slightly_structured);

        let outcome = run(&input(&mostly_prose), &extractor);

        assert_eq!(outcome.status, ParseStatus::Unparseable);
        assert_eq!(outcome.path, ExtractionPath::HtmlRendered);
        assert_eq!(outcome.act.section_count(), 1);
    }

    #[test]
    fn test_outcome_metadata_records_path_and_doc_id() {
        let outcome = run(&input(STRUCTURED), &InMemoryExtractor::new());

        assert_eq!(outcome.act.metadata.get("doc_id").map(String::as_str), Some("test-act"));
        assert_eq!(
            outcome.act.metadata.get("extraction_path").map(String::as_str),
            Some("pdf_layout")
        );
    }
}
