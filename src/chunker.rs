//! Retrieval chunk emission.
//!
//! Walks a validated Act tree and yields one retrieval unit per Section, or
//! per SubSection when a section's total content exceeds the configured
//! threshold. Chunks copy their citation strings out of the tree, so the
//! tree may be discarded once emission finishes. The emitter guarantees
//! that concatenating all chunk texts in emission order reproduces every
//! leaf content string exactly once - the property that makes
//! citation-backed retrieval trustworthy.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::types::{Act, Section};

/// The ancestor path identifying one provision precisely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Title of the Act.
    pub act_title: String,

    /// Year of enactment, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_year: Option<String>,

    /// Part number, when the document uses the Part tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,

    /// Chapter number, when the document uses the Chapter tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<String>,

    /// Section number - always present; the Section is the citable unit.
    pub section_number: String,

    /// SubSection number for per-subsection chunks of oversized sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_section_number: Option<String>,
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.act_title)?;
        if let Some(part) = &self.part_number {
            write!(f, ", Part {part}")?;
        }
        if let Some(chapter) = &self.chapter_number {
            write!(f, ", Chapter {chapter}")?;
        }
        write!(f, ", Section {}", self.section_number)?;
        if let Some(sub) = &self.sub_section_number {
            write!(f, "({sub})")?;
        }
        Ok(())
    }
}

/// One retrieval unit: verbatim text plus its citation metadata.
///
/// Serializes as a flat record (citation fields inlined) so the indexing
/// collaborator never sees tree nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The node's own content plus all descendant content, document order.
    pub text: String,

    /// Copied ancestor path, no live references into the tree.
    #[serde(flatten)]
    pub citation: Citation,

    /// URL of the source document.
    pub source_url: String,
}

impl Chunk {
    /// Text prefixed with a human-readable ancestor header, for embedding.
    ///
    /// Retrieval quality improves when the embedded text carries its
    /// context; `text` itself stays verbatim so the round-trip guarantee
    /// holds.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        let mut header = format!("Act: {}", self.citation.act_title);
        if let Some(year) = &self.citation.act_year {
            header.push_str(&format!(", {year}"));
        }
        if let Some(part) = &self.citation.part_number {
            header.push_str(&format!("\nPart: {part}"));
        }
        if let Some(chapter) = &self.citation.chapter_number {
            header.push_str(&format!("\nChapter: {chapter}"));
        }
        header.push_str(&format!("\nSection (दफा) {}", self.citation.section_number));
        if let Some(sub) = &self.citation.sub_section_number {
            header.push_str(&format!("\nSubSection (उपदफा) {sub}"));
        }
        format!("{header}\n{}", self.text)
    }
}

/// Walks an Act tree and emits chunks.
///
/// The emitter borrows the tree read-only; create it as many times as
/// needed to restart emission (e.g., re-chunking with a different
/// threshold).
pub struct ChunkEmitter<'a> {
    act: &'a Act,
    threshold: usize,
}

impl<'a> ChunkEmitter<'a> {
    /// Create an emitter over a validated tree.
    #[must_use]
    pub fn new(act: &'a Act, config: &ParserConfig) -> Self {
        Self {
            act,
            threshold: config.chunk_size_threshold,
        }
    }

    /// Lazy, finite, restartable chunk sequence.
    #[must_use]
    pub fn iter(&self) -> Chunks<'a> {
        // Collect section positions up front (cheap, references only);
        // chunk text is assembled lazily per section visit
        let mut sections: VecDeque<SectionRef<'a>> = VecDeque::new();
        for part in &self.act.parts {
            for chapter in &part.chapters {
                for section in &chapter.sections {
                    sections.push_back(SectionRef {
                        part_number: Some(&part.number),
                        chapter_number: Some(&chapter.number),
                        section,
                    });
                }
            }
        }
        for chapter in &self.act.chapters {
            for section in &chapter.sections {
                sections.push_back(SectionRef {
                    part_number: None,
                    chapter_number: Some(&chapter.number),
                    section,
                });
            }
        }
        for section in &self.act.sections {
            sections.push_back(SectionRef {
                part_number: None,
                chapter_number: None,
                section,
            });
        }

        Chunks {
            act: self.act,
            threshold: self.threshold,
            sections,
            pending: VecDeque::new(),
        }
    }
}

/// A section together with its ancestor numbers.
#[derive(Debug, Clone, Copy)]
struct SectionRef<'a> {
    part_number: Option<&'a str>,
    chapter_number: Option<&'a str>,
    section: &'a Section,
}

/// Iterator state for chunk emission.
pub struct Chunks<'a> {
    act: &'a Act,
    threshold: usize,
    sections: VecDeque<SectionRef<'a>>,
    pending: VecDeque<Chunk>,
}

impl Chunks<'_> {
    fn citation(&self, section_ref: &SectionRef<'_>, sub_number: Option<&str>) -> Citation {
        Citation {
            act_title: self.act.title.clone(),
            act_year: self.act.act_year.clone(),
            part_number: section_ref.part_number.map(str::to_string),
            chapter_number: section_ref.chapter_number.map(str::to_string),
            section_number: section_ref.section.section_number.clone(),
            sub_section_number: sub_number.map(str::to_string),
        }
    }

    fn chunk(&self, citation: Citation, pieces: Vec<&str>) -> Option<Chunk> {
        if pieces.is_empty() {
            return None;
        }
        Some(Chunk {
            text: pieces.join("\n"),
            citation,
            source_url: self.act.source_url.clone(),
        })
    }

    /// Produce the chunk(s) for one section and queue them.
    fn visit_section(&mut self, section_ref: SectionRef<'_>) {
        let section = section_ref.section;

        if section.total_content_len() <= self.threshold {
            // Single section-level chunk: own content plus all descendant
            // content in document order
            let mut pieces: Vec<&str> = Vec::new();
            push_nonempty(&mut pieces, &section.content);
            for clause in &section.clauses {
                push_nonempty(&mut pieces, &clause.content);
            }
            for sub in &section.sub_sections {
                push_nonempty(&mut pieces, &sub.content);
                for clause in &sub.clauses {
                    push_nonempty(&mut pieces, &clause.content);
                }
            }
            if let Some(chunk) = self.chunk(self.citation(&section_ref, None), pieces) {
                self.pending.push_back(chunk);
            }
            return;
        }

        // Oversized: section-level prefix content and direct clauses first,
        // then one chunk per subsection, so nothing is dropped
        let mut lead: Vec<&str> = Vec::new();
        push_nonempty(&mut lead, &section.content);
        for clause in &section.clauses {
            push_nonempty(&mut lead, &clause.content);
        }
        if let Some(chunk) = self.chunk(self.citation(&section_ref, None), lead) {
            self.pending.push_back(chunk);
        }

        for sub in &section.sub_sections {
            let mut pieces: Vec<&str> = Vec::new();
            push_nonempty(&mut pieces, &sub.content);
            for clause in &sub.clauses {
                push_nonempty(&mut pieces, &clause.content);
            }
            if let Some(chunk) = self.chunk(self.citation(&section_ref, Some(&sub.number)), pieces)
            {
                self.pending.push_back(chunk);
            }
        }
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                return Some(chunk);
            }
            let section_ref = self.sections.pop_front()?;
            self.visit_section(section_ref);
        }
    }
}

fn push_nonempty<'a>(pieces: &mut Vec<&'a str>, text: &'a str) {
    if !text.trim().is_empty() {
        pieces.push(text);
    }
}
