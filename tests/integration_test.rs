//! End-to-end integration tests for the ingest pipeline.
//!
//! Tests the complete pipeline from raw extracted text to YAML generation
//! and chunk emission, using a fixture Act (चोरी सम्बन्धी ऐन, २०७४).

use std::fs;
use std::path::Path;

use vidhi_ingest::chunker::ChunkEmitter;
use vidhi_ingest::config::ParserConfig;
use vidhi_ingest::fallback::{ExtractionPath, InMemoryExtractor};
use vidhi_ingest::patterns::MarkerPatternSet;
use vidhi_ingest::pipeline::{parse_document, ParseOutcome, ParseStatus};
use vidhi_ingest::types::DocumentInput;
use vidhi_ingest::yaml::generate_yaml;

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Run the pipeline on the चोरी ऐन fixture.
fn run_pipeline() -> ParseOutcome {
    let text = load_fixture("chori_ain.txt");
    let input = DocumentInput::new(
        "chori-ain-2074",
        "https://lawcommission.gov.np/chori-ain.pdf",
        text,
        ExtractionPath::PdfLayout,
    );
    parse_document(
        &input,
        &InMemoryExtractor::new(),
        &ParserConfig::default(),
        &MarkerPatternSet::nepali(),
    )
}

#[test]
fn test_pipeline_parses_on_first_attempt() {
    let outcome = run_pipeline();

    assert_eq!(outcome.status, ParseStatus::Parsed);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.path, ExtractionPath::PdfLayout);
    assert!(!outcome.needs_review());
}

#[test]
fn test_pipeline_title_and_year() {
    let outcome = run_pipeline();

    // Devanagari digits in the title line are normalized in the output
    assert_eq!(outcome.act.title, "चोरी सम्बन्धी ऐन, 2074");
    assert_eq!(outcome.act.act_year.as_deref(), Some("2074"));
}

#[test]
fn test_pipeline_hierarchy_shape() {
    let outcome = run_pipeline();
    let act = &outcome.act;

    assert_eq!(act.parts.len(), 1);
    assert!(act.chapters.is_empty());
    assert!(act.sections.is_empty());

    let part = &act.parts[0];
    assert_eq!(part.number, "1");
    assert_eq!(part.title, "सुरुका कुरा");
    assert_eq!(part.chapters.len(), 2);

    assert_eq!(part.chapters[0].title, "सामान्य");
    assert_eq!(part.chapters[0].sections.len(), 2);
    assert_eq!(part.chapters[1].title, "कसूर र सजाय");
    assert_eq!(part.chapters[1].sections.len(), 1);
    assert_eq!(act.section_count(), 3);
}

#[test]
fn test_pipeline_section_details() {
    let outcome = run_pipeline();
    let chapter_one = &outcome.act.parts[0].chapters[0];

    // Section 1: marker tail becomes the title, subsections carry the text
    let section_one = &chapter_one.sections[0];
    assert_eq!(section_one.section_number, "1");
    assert_eq!(section_one.title.as_deref(), Some("संक्षिप्त नाम र प्रारम्भ"));
    assert_eq!(section_one.sub_sections.len(), 2);
    assert!(section_one.sub_sections[0].content.contains("यस ऐनको नाम"));

    // Section 2: clauses attach directly under the section (no उपदफा tier)
    let section_two = &chapter_one.sections[1];
    assert_eq!(section_two.section_number, "2");
    assert!(section_two.content.contains("विषय वा प्रसङ्गले"));
    assert_eq!(section_two.clauses.len(), 2);
    assert_eq!(section_two.clauses[0].number, "क");
    assert!(section_two.clauses[0].content.contains("चोरी"));
}

#[test]
fn test_pipeline_clause_under_subsection() {
    let outcome = run_pipeline();
    let section_three = &outcome.act.parts[0].chapters[1].sections[0];

    assert_eq!(section_three.sub_sections.len(), 2);
    let sub_two = &section_three.sub_sections[1];
    assert_eq!(sub_two.clauses.len(), 1);
    assert!(sub_two.clauses[0].content.contains("थप सजाय"));
}

#[test]
fn test_pipeline_preamble() {
    let outcome = run_pipeline();

    assert!(outcome.act.preamble.contains("प्रस्तावना"));
    assert!(outcome.act.preamble.contains("वाञ्छनीय"));
}

#[test]
fn test_chunks_cite_full_ancestor_path() {
    let outcome = run_pipeline();
    let config = ParserConfig::default();
    let emitter = ChunkEmitter::new(&outcome.act, &config);
    let chunks: Vec<_> = emitter.iter().collect();

    assert_eq!(chunks.len(), 3);

    let first = &chunks[0];
    assert_eq!(first.citation.act_title, "चोरी सम्बन्धी ऐन, 2074");
    assert_eq!(first.citation.part_number.as_deref(), Some("1"));
    assert_eq!(first.citation.chapter_number.as_deref(), Some("1"));
    assert_eq!(first.citation.section_number, "1");

    let third = &chunks[2];
    assert_eq!(third.citation.chapter_number.as_deref(), Some("2"));
    assert_eq!(third.citation.section_number, "3");
    assert!(third.text.contains("कसैले चोरी गर्नु हुँदैन"));
    assert!(third.text.contains("थप सजाय"));
}

#[test]
fn test_part_without_chapter_keeps_part_in_citations() {
    // A document that uses भाग but never परिच्छेद: the declared part must
    // still appear in every chunk citation
    let text = "भाग १ सुरुका कुरा\nदफा १. नाम\nयो ऐनको नाम हो।\n";
    let input = DocumentInput::new(
        "part-only-doc",
        "https://example.org/part-only.pdf",
        text,
        ExtractionPath::PdfLayout,
    );
    let outcome = parse_document(
        &input,
        &InMemoryExtractor::new(),
        &ParserConfig::default(),
        &MarkerPatternSet::nepali(),
    );

    assert_eq!(outcome.status, ParseStatus::Parsed);
    assert!(outcome.act.sections.is_empty());

    let config = ParserConfig::default();
    let chunks: Vec<_> = ChunkEmitter::new(&outcome.act, &config).iter().collect();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].citation.part_number.as_deref(), Some("1"));
    assert_eq!(chunks[0].citation.section_number, "1");
}

#[test]
fn test_chunks_round_trip_every_leaf() {
    let outcome = run_pipeline();
    let config = ParserConfig::default();
    let all_text: String = ChunkEmitter::new(&outcome.act, &config)
        .iter()
        .map(|c| c.text)
        .collect::<Vec<_>>()
        .join("\n");

    // Every provision body appears in the emitted chunks
    for needle in [
        "यस ऐनको नाम",
        "तुरुन्त प्रारम्भ",
        "विषय वा प्रसङ्गले",
        "चल सम्पत्ति लिने",
        "चल अचल सबै",
        "कसैले चोरी गर्नु हुँदैन",
        "तीन वर्षसम्म कैद",
        "थप सजाय",
    ] {
        assert!(
            all_text.matches(needle).count() == 1,
            "Provision text should appear exactly once: {needle}"
        );
    }
}

#[test]
fn test_prose_document_falls_back_once_then_flags() {
    let prose = "यो कुनै संरचना नभएको लामो गद्य हो।\n".repeat(30);
    let input = DocumentInput::new(
        "prose-doc",
        "https://example.org/prose.pdf",
        prose.clone(),
        ExtractionPath::PdfLayout,
    );
    // Alternate rendition is the same prose, so both attempts fail
    let extractor = InMemoryExtractor::new().with_html_rendered(prose);
    let outcome = parse_document(
        &input,
        &extractor,
        &ParserConfig::default(),
        &MarkerPatternSet::nepali(),
    );

    assert_eq!(outcome.status, ParseStatus::Unparseable);
    assert_eq!(outcome.attempts, 2);
    assert!(outcome.needs_review());
    // Best-effort tree still carries the text as preamble
    assert!(outcome.act.preamble.contains("गद्य"));
}

#[test]
fn test_fallback_recovers_structured_rendition() {
    let prose = "संरचना नभएको गद्य मात्र।\n".repeat(30);
    let input = DocumentInput::new(
        "doc-1",
        "https://example.org/act.pdf",
        prose,
        ExtractionPath::PdfLayout,
    );
    let extractor = InMemoryExtractor::new().with_html_rendered(load_fixture("chori_ain.txt"));
    let outcome = parse_document(
        &input,
        &extractor,
        &ParserConfig::default(),
        &MarkerPatternSet::nepali(),
    );

    assert_eq!(outcome.status, ParseStatus::Parsed);
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.path, ExtractionPath::HtmlRendered);
    assert_eq!(outcome.act.section_count(), 3);
}

#[test]
fn test_yaml_generation() {
    let outcome = run_pipeline();
    let yaml = generate_yaml(&outcome.act).expect("Failed to generate YAML");

    assert!(yaml.starts_with("---\n"), "YAML should start with document marker");
    assert!(yaml.contains("title: चोरी सम्बन्धी ऐन, 2074"));
    assert!(yaml.contains("year: '2074'"));
    assert!(yaml.contains("parts:"));
    assert!(yaml.contains("sub_sections:"));
}

#[test]
fn test_yaml_validates_structure() {
    let outcome = run_pipeline();
    let yaml = generate_yaml(&outcome.act).expect("Failed to generate YAML");

    let parsed: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(&yaml).expect("Generated YAML should be valid");

    assert!(parsed.get("title").is_some(), "Should have title");
    assert!(parsed.get("url").is_some(), "Should have url");

    let parts = parsed.get("parts").expect("Should have parts");
    assert!(parts.is_sequence(), "parts should be an array");
}

#[test]
fn test_pipeline_metadata_carries_doc_id_and_path() {
    let outcome = run_pipeline();

    assert_eq!(outcome.doc_id, "chori-ain-2074");
    assert_eq!(
        outcome.act.metadata.get("doc_id").map(String::as_str),
        Some("chori-ain-2074")
    );
    assert_eq!(
        outcome.act.metadata.get("extraction_path").map(String::as_str),
        Some("pdf_layout")
    );
}
