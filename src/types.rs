//! Core data types for the ingestion core.
//!
//! The tree model mirrors the structure of Nepali legislation:
//! Act → Part (भाग) → Chapter (परिच्छेद) → Section (दफा) →
//! SubSection (उपदफा) → Clause (खण्ड). Part, Chapter and SubSection are
//! optional tiers; Sections may sit directly under the Act and Clauses
//! directly under a Section.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fallback::ExtractionPath;

/// Structural tiers of a legal document, plus body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// भाग - top-level grouping, optional.
    Part,
    /// परिच्छेद - chapter.
    Chapter,
    /// दफा - the primary citable unit.
    Section,
    /// उपदफा - numbered subsection, optional.
    SubSection,
    /// खण्ड - finest-grained unit, leaf.
    Clause,
    /// Unmarked prose belonging to the innermost open node.
    Body,
}

impl Tier {
    /// Nesting depth of a structural tier (Part shallowest, Clause deepest).
    ///
    /// `None` for body text, which is not a tier of its own.
    #[must_use]
    pub fn depth(&self) -> Option<u8> {
        match self {
            Self::Part => Some(1),
            Self::Chapter => Some(2),
            Self::Section => Some(3),
            Self::SubSection => Some(4),
            Self::Clause => Some(5),
            Self::Body => None,
        }
    }

    /// Whether this tier opens a node in the tree.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Body)
    }

    /// Human-readable tier name for warnings and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Part => "part",
            Self::Chapter => "chapter",
            Self::Section => "section",
            Self::SubSection => "sub_section",
            Self::Clause => "clause",
            Self::Body => "body",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The smallest unit of legal text (e.g., "(क)", "(1)").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Clause marker within its parent (e.g., "क", "1").
    pub number: String,

    /// Verbatim clause text.
    pub content: String,
}

impl Clause {
    /// Create a new clause.
    #[must_use]
    pub fn new(number: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            content: content.into(),
        }
    }
}

/// A numbered subsection (उपदफा) within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    /// Subsection number.
    pub number: String,

    /// Verbatim subsection text, excluding nested clause markers.
    pub content: String,

    /// Clauses nested under this subsection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clauses: Vec<Clause>,
}

impl SubSection {
    /// Create a new subsection with no clauses.
    #[must_use]
    pub fn new(number: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            content: content.into(),
            clauses: Vec::new(),
        }
    }
}

/// A section (दफा) - the primary citable provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section number as cited (e.g., "1", "22").
    pub section_number: String,

    /// Section title when the marker line carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text of the section, excluding nested markers.
    pub content: String,

    /// Subsections nested under this section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_sections: Vec<SubSection>,

    /// Clauses attached directly under this section (subsection tier skipped).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clauses: Vec<Clause>,
}

impl Section {
    /// Create a new empty section.
    #[must_use]
    pub fn new(section_number: impl Into<String>) -> Self {
        Self {
            section_number: section_number.into(),
            title: None,
            content: String::new(),
            sub_sections: Vec::new(),
            clauses: Vec::new(),
        }
    }

    /// Total content length of this section including all descendants.
    ///
    /// Used by the chunk emitter to decide whether to split per SubSection.
    #[must_use]
    pub fn total_content_len(&self) -> usize {
        let own = self.content.len();
        let direct_clauses: usize = self.clauses.iter().map(|c| c.content.len()).sum();
        let subs: usize = self
            .sub_sections
            .iter()
            .map(|s| {
                s.content.len() + s.clauses.iter().map(|c| c.content.len()).sum::<usize>()
            })
            .sum();
        own + direct_clauses + subs
    }

    /// Whether the section carries any text or children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.sub_sections.is_empty() && self.clauses.is_empty()
    }
}

/// A chapter (परिच्छेद).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number.
    pub number: String,

    /// Chapter title.
    pub title: String,

    /// Sections within this chapter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl Chapter {
    /// Create a new empty chapter.
    #[must_use]
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }
}

/// A part (भाग) - optional top-level grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Part number.
    pub number: String,

    /// Part title.
    pub title: String,

    /// Chapters within this part.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<Chapter>,
}

impl Part {
    /// Create a new empty part.
    #[must_use]
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            chapters: Vec::new(),
        }
    }
}

/// Regex for slug generation - matches non-word characters.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Regex for slug generation - matches whitespace and dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_SPACE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// The root of the hierarchy: a complete piece of legislation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    /// Full title of the Act.
    pub title: String,

    /// Year of enactment (Bikram Sambat or Gregorian, as printed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_year: Option<String>,

    /// URL the document was retrieved from.
    pub source_url: String,

    /// Document-level text preceding the first structural marker.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preamble: String,

    /// Parts, when the document uses the भाग tier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,

    /// Chapters directly under the Act when no Parts exist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<Chapter>,

    /// Sections directly under the Act when neither Parts nor Chapters exist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,

    /// Free-form metadata supplied by the acquisition collaborator.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,

    /// When the source document was retrieved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_at: Option<DateTime<Utc>>,
}

impl Act {
    /// Create a new empty act.
    #[must_use]
    pub fn new(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            act_year: None,
            source_url: source_url.into(),
            preamble: String::new(),
            parts: Vec::new(),
            chapters: Vec::new(),
            sections: Vec::new(),
            metadata: BTreeMap::new(),
            retrieved_at: None,
        }
    }

    /// Generate a filesystem-friendly slug from the title.
    ///
    /// # Examples
    /// ```
    /// use vidhi_ingest::types::Act;
    ///
    /// let act = Act::new("Muluki Criminal Code, 2074", "https://example.org");
    /// assert_eq!(act.to_slug(), "muluki_criminal_code_2074");
    /// ```
    #[must_use]
    pub fn to_slug(&self) -> String {
        let text = self.title.to_lowercase();
        let text = SLUG_NON_WORD.replace_all(&text, "");
        let text = SLUG_SPACE_DASH.replace_all(&text, "_");
        text.trim_matches('_').to_string()
    }

    /// Number of sections in the whole tree.
    #[must_use]
    pub fn section_count(&self) -> usize {
        let in_parts: usize = self
            .parts
            .iter()
            .flat_map(|p| &p.chapters)
            .map(|c| c.sections.len())
            .sum();
        let in_chapters: usize = self.chapters.iter().map(|c| c.sections.len()).sum();
        in_parts + in_chapters + self.sections.len()
    }
}

/// Kinds of structural-ambiguity warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Two siblings under the same parent declare the same number.
    DuplicateNumber,

    /// A sibling's number is lower than its predecessor's.
    OutOfOrderNumber,

    /// A section ended with no content and no children.
    EmptySection,
}

/// A non-fatal annotation recorded during tree assembly.
///
/// Legal text is allowed to have irregular numbering (renumbered
/// amendments), so these never abort a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// What kind of irregularity was observed.
    pub kind: WarningKind,

    /// The tier the offending node belongs to.
    pub tier: Tier,

    /// The declared number of the offending node.
    pub number: String,

    /// Human-readable description.
    pub message: String,
}

/// A document handed to the pipeline by the acquisition collaborator.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Stable identifier for the source document.
    pub doc_id: String,

    /// URL the document was retrieved from.
    pub source_url: String,

    /// UTF-8 text produced by the primary extraction path.
    pub text: String,

    /// Which extraction path produced `text`.
    pub path: ExtractionPath,

    /// When the document was retrieved.
    pub retrieved_at: Option<DateTime<Utc>>,
}

impl DocumentInput {
    /// Create a new document input.
    #[must_use]
    pub fn new(
        doc_id: impl Into<String>,
        source_url: impl Into<String>,
        text: impl Into<String>,
        path: ExtractionPath,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            source_url: source_url.into(),
            text: text.into(),
            path,
            retrieved_at: None,
        }
    }

    /// Attach the retrieval timestamp.
    #[must_use]
    pub fn with_retrieved_at(mut self, at: DateTime<Utc>) -> Self {
        self.retrieved_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_depth_ordering() {
        assert!(Tier::Part.depth() < Tier::Chapter.depth());
        assert!(Tier::Chapter.depth() < Tier::Section.depth());
        assert!(Tier::Section.depth() < Tier::SubSection.depth());
        assert!(Tier::SubSection.depth() < Tier::Clause.depth());
        assert_eq!(Tier::Body.depth(), None);
    }

    #[test]
    fn test_tier_is_structural() {
        assert!(Tier::Section.is_structural());
        assert!(!Tier::Body.is_structural());
    }

    #[test]
    fn test_act_to_slug() {
        let act = Act::new("Muluki Criminal Code, 2074", "https://example.org");
        assert_eq!(act.to_slug(), "muluki_criminal_code_2074");
    }

    #[test]
    fn test_act_to_slug_special_chars() {
        let act = Act::new("Privacy (Amendment) Act - 2075!", "url");
        assert_eq!(act.to_slug(), "privacy_amendment_act_2075");
    }

    #[test]
    fn test_section_total_content_len() {
        let mut section = Section::new("1");
        section.content = "abcd".to_string(); // 4
        section.clauses.push(Clause::new("क", "ef")); // 2
        let mut sub = SubSection::new("1", "ghi"); // 3
        sub.clauses.push(Clause::new("ख", "j")); // 1
        section.sub_sections.push(sub);

        assert_eq!(section.total_content_len(), 10);
    }

    #[test]
    fn test_section_is_empty() {
        let mut section = Section::new("1");
        assert!(section.is_empty());

        section.content = "  ".to_string();
        assert!(section.is_empty());

        section.clauses.push(Clause::new("क", "text"));
        assert!(!section.is_empty());
    }

    #[test]
    fn test_section_count_across_attachment_points() {
        let mut act = Act::new("Test Act", "url");

        let mut part = Part::new("1", "First");
        let mut chapter = Chapter::new("1", "General");
        chapter.sections.push(Section::new("1"));
        chapter.sections.push(Section::new("2"));
        part.chapters.push(chapter);
        act.parts.push(part);

        let mut direct_chapter = Chapter::new("2", "Direct");
        direct_chapter.sections.push(Section::new("3"));
        act.chapters.push(direct_chapter);

        act.sections.push(Section::new("4"));

        assert_eq!(act.section_count(), 4);
    }

    #[test]
    fn test_act_serialization_roundtrip() {
        let mut act = Act::new("Test Act, 2074", "https://example.org/act.pdf");
        act.act_year = Some("2074".to_string());
        let mut chapter = Chapter::new("1", "General");
        let mut section = Section::new("1");
        section.content = "Section text".to_string();
        section.clauses.push(Clause::new("क", "Clause text"));
        chapter.sections.push(section);
        act.chapters.push(chapter);

        let json = serde_json::to_string(&act).unwrap();
        let back: Act = serde_json::from_str(&json).unwrap();
        assert_eq!(act, back);
    }
}
