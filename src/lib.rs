//! Vidhi Ingest - Parse Nepali legislation into structured YAML archives.
//!
//! This crate turns raw extracted text of Nepali Acts (from PDF layout
//! extraction or rendered HTML) into a validated Part/Chapter/Section
//! hierarchy, emits citation-backed retrieval chunks, and archives the
//! tree as YAML.
//!
//! # Example
//!
//! ```
//! use vidhi_ingest::patterns::MarkerPatternSet;
//! use vidhi_ingest::tokenizer::tokenize;
//! use vidhi_ingest::builder::build_tree;
//!
//! let patterns = MarkerPatternSet::nepali();
//! let text = "चोरी ऐन, 2074\nदफा 1. चोरीको परिभाषा\nचोरी गर्ने व्यक्ति...";
//! let result = build_tree(tokenize(text, &patterns), "https://example.org/act.pdf");
//! assert_eq!(result.act.sections.len(), 1);
//! ```
//!
//! # Architecture
//!
//! The pipeline is organized into several modules:
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Core data types (Act, Part, Chapter, Section, etc.)
//! - [`error`]: Error types and Result alias
//! - [`numerals`]: Devanagari digit normalization
//! - [`patterns`]: Structural marker regexes and classification
//! - [`tokenizer`]: Line-oriented structural tokenization
//! - [`builder`]: Hierarchy assembly and validation
//! - [`fallback`]: Alternate-extraction-path seam
//! - [`pipeline`]: End-to-end parse orchestration
//! - [`chunker`]: Retrieval chunk emission
//! - [`yaml`]: YAML archive output
//! - [`cli`]: Command-line interface

pub mod builder;
pub mod chunker;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod numerals;
pub mod patterns;
pub mod pipeline;
pub mod tokenizer;
pub mod types;
pub mod yaml;

// Re-export main entry points
pub use pipeline::{parse_document, ParseOutcome, ParseStatus};

// Re-export commonly used items
pub use chunker::{Chunk, ChunkEmitter, Citation};
pub use config::ParserConfig;
pub use error::{IngestError, Result};
pub use fallback::{ExtractionPath, InMemoryExtractor, TextExtractor};
pub use types::{Act, Chapter, Clause, DocumentInput, Part, Section, SubSection, Tier};
