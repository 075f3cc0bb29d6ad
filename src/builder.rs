//! Parent-stack hierarchy assembly.
//!
//! Consumes the ordered token stream and assembles the Act tree. Because
//! tiers may legally be skipped (an act with no भाग, a section with clauses
//! but no उपदफा), the builder keeps one open frame per tier and closes all
//! frames at the same or deeper tier before opening a new node - an explicit
//! stack popping to the nearest valid ancestor, not a recursive-descent
//! grammar.

use std::cmp::Ordering;

use crate::types::{
    Act, Chapter, Clause, ParseWarning, Part, Section, SubSection, Tier, WarningKind,
};
use crate::tokenizer::Token;

/// How many leading preamble lines are searched for the act title.
const TITLE_SEARCH_LINES: usize = 50;

/// How many leading preamble lines are searched for the act year.
const YEAR_SEARCH_LINES: usize = 5;

/// Counters for the fallback trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Tokens classified as a structural tier.
    pub structural_tokens: usize,

    /// All tokens seen (one per non-empty line).
    pub total_lines: usize,
}

impl BuildStats {
    /// Fraction of lines that carried a structural marker.
    ///
    /// Zero for an empty document, so pure noise and empty input both land
    /// below any positive threshold.
    #[must_use]
    pub fn structural_fraction(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.structural_tokens as f64 / self.total_lines as f64
    }
}

/// Output of one build pass: the tree, its warnings, and trigger stats.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The assembled tree (always returned, even for thin structure).
    pub act: Act,

    /// Structural-ambiguity warnings recorded during assembly.
    pub warnings: Vec<ParseWarning>,

    /// Counters the pipeline uses to decide on fallback.
    pub stats: BuildStats,
}

/// Stack-based tree assembler.
pub struct HierarchyBuilder {
    act: Act,
    current_part: Option<Part>,
    current_chapter: Option<Chapter>,
    current_section: Option<Section>,
    current_sub_section: Option<SubSection>,
    current_clause: Option<Clause>,
    preamble_lines: Vec<String>,
    stats: BuildStats,
}

impl HierarchyBuilder {
    /// Create a builder for one document.
    #[must_use]
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            act: Act::new("", source_url),
            current_part: None,
            current_chapter: None,
            current_section: None,
            current_sub_section: None,
            current_clause: None,
            preamble_lines: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    /// Feed one token in document order.
    pub fn push(&mut self, token: Token) {
        self.stats.total_lines += 1;
        if token.tier.is_structural() {
            self.stats.structural_tokens += 1;
        }

        let number = token.number.clone().unwrap_or_default();
        match token.tier {
            Tier::Part => {
                self.close_section();
                self.close_chapter();
                self.close_part();
                self.current_part = Some(Part::new(number, token.text));
            }
            Tier::Chapter => {
                self.close_section();
                self.close_chapter();
                self.current_chapter = Some(Chapter::new(number, token.text));
            }
            Tier::Section => {
                self.close_section();
                let mut section = Section::new(number);
                if !token.text.is_empty() {
                    section.title = Some(token.text);
                }
                self.current_section = Some(section);
            }
            Tier::SubSection => {
                if self.current_section.is_none() {
                    // A paren-digit marker before any section opens cannot
                    // attach anywhere; keep the whole line, marker included,
                    // as body text instead of inventing a section for it.
                    self.append_body(&demoted_line(&number, &token.text));
                    return;
                }
                self.close_clause();
                self.close_sub_section();
                self.current_sub_section = Some(SubSection::new(number, token.text));
            }
            Tier::Clause => {
                if self.current_section.is_none() {
                    self.append_body(&demoted_line(&number, &token.text));
                    return;
                }
                self.close_clause();
                self.current_clause = Some(Clause::new(number, token.text));
            }
            Tier::Body => self.append_body(&token.text),
        }
    }

    /// Close all open frames, derive act metadata, validate, and return.
    #[must_use]
    pub fn finish(mut self) -> BuildResult {
        self.close_section();
        self.close_chapter();
        self.close_part();

        self.act.title = find_title(&self.preamble_lines);
        self.act.act_year = find_year(&self.preamble_lines);
        self.act.preamble = self.preamble_lines.join("\n");

        let warnings = validate_tree(&self.act);
        if !warnings.is_empty() {
            tracing::warn!(
                count = warnings.len(),
                act = %self.act.title,
                "Structural ambiguities recorded during tree assembly"
            );
        }

        BuildResult {
            act: self.act,
            warnings,
            stats: self.stats,
        }
    }

    /// Append body text to the innermost open node.
    ///
    /// A body line directly after a Part/Chapter marker that carried no
    /// inline title becomes that title; with nothing open at all, lines
    /// accumulate as the document preamble.
    fn append_body(&mut self, text: &str) {
        if let Some(clause) = self.current_clause.as_mut() {
            append_line(&mut clause.content, text);
        } else if let Some(sub) = self.current_sub_section.as_mut() {
            append_line(&mut sub.content, text);
        } else if let Some(section) = self.current_section.as_mut() {
            append_line(&mut section.content, text);
        } else if let Some(chapter) = self
            .current_chapter
            .as_mut()
            .filter(|c| c.title.is_empty())
        {
            chapter.title = text.to_string();
        } else if let Some(part) = self.current_part.as_mut().filter(|p| p.title.is_empty()) {
            part.title = text.to_string();
        } else {
            self.preamble_lines.push(text.to_string());
        }
    }

    fn close_clause(&mut self) {
        if let Some(clause) = self.current_clause.take() {
            if let Some(sub) = self.current_sub_section.as_mut() {
                sub.clauses.push(clause);
            } else if let Some(section) = self.current_section.as_mut() {
                section.clauses.push(clause);
            }
        }
    }

    fn close_sub_section(&mut self) {
        self.close_clause();
        if let Some(sub) = self.current_sub_section.take() {
            if let Some(section) = self.current_section.as_mut() {
                section.sub_sections.push(sub);
            }
        }
    }

    fn close_section(&mut self) {
        self.close_sub_section();
        if let Some(section) = self.current_section.take() {
            if let Some(chapter) = self.current_chapter.as_mut() {
                chapter.sections.push(section);
            } else if self.current_part.is_some() {
                // A भाग with no परिच्छेद under it: open a default chapter so
                // the sections stay under their declared part and citations
                // keep the part number
                let mut chapter = Chapter::new("1", "सामान्य (General)");
                chapter.sections.push(section);
                self.current_chapter = Some(chapter);
            } else {
                // No chapter tier in this document; sections attach to the act
                self.act.sections.push(section);
            }
        }
    }

    fn close_chapter(&mut self) {
        if let Some(chapter) = self.current_chapter.take() {
            if let Some(part) = self.current_part.as_mut() {
                part.chapters.push(chapter);
            } else {
                self.act.chapters.push(chapter);
            }
        }
    }

    fn close_part(&mut self) {
        if let Some(part) = self.current_part.take() {
            self.act.parts.push(part);
        }
    }
}

/// Build a tree from a token stream.
#[must_use]
pub fn build_tree<I>(tokens: I, source_url: &str) -> BuildResult
where
    I: IntoIterator<Item = Token>,
{
    let mut builder = HierarchyBuilder::new(source_url);
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}

fn append_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(line);
}

/// Rebuild a marker line that is being demoted to body text.
fn demoted_line(number: &str, rest: &str) -> String {
    if rest.is_empty() {
        format!("({number})")
    } else {
        format!("({number}) {rest}")
    }
}

/// Find the act title in the opening preamble lines.
///
/// The title line of Nepal Law Commission documents contains the ऐन (Act)
/// keyword. Header/footer noise such as URLs and bare page numbers is
/// skipped in the fallback scan.
fn find_title(lines: &[String]) -> String {
    for line in lines.iter().take(TITLE_SEARCH_LINES) {
        if line.contains("ऐन") {
            return line.trim().to_string();
        }
    }

    for line in lines.iter().take(20) {
        if line.contains("www.") || line.contains("http") || line.len() < 5 {
            continue;
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        return line.trim().to_string();
    }

    "Unknown Act".to_string()
}

/// Find a 4-digit year (Bikram Sambat or Gregorian) in the opening lines.
fn find_year(lines: &[String]) -> Option<String> {
    for line in lines.iter().take(YEAR_SEARCH_LINES) {
        let bytes = line.as_bytes();
        let mut run_start = None;
        for (i, b) in bytes.iter().enumerate() {
            if b.is_ascii_digit() {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                if i - start == 4 {
                    return Some(line[start..i].to_string());
                }
            }
        }
        if let Some(start) = run_start {
            if bytes.len() - start == 4 {
                return Some(line[start..].to_string());
            }
        }
    }
    None
}

/// Compare two sibling numbers, numerically when both are integers.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Check one sibling group for duplicate and out-of-order numbering.
fn check_sibling_numbers<'a, I>(numbers: I, tier: Tier, warnings: &mut Vec<ParseWarning>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut prev: Option<&str> = None;
    for number in numbers {
        if let Some(prev) = prev {
            match compare_numbers(prev, number) {
                Ordering::Equal => warnings.push(ParseWarning {
                    kind: WarningKind::DuplicateNumber,
                    tier,
                    number: number.to_string(),
                    message: format!("{tier} {number} repeats its predecessor's number"),
                }),
                Ordering::Greater => warnings.push(ParseWarning {
                    kind: WarningKind::OutOfOrderNumber,
                    tier,
                    number: number.to_string(),
                    message: format!("{tier} {number} follows higher-numbered sibling {prev}"),
                }),
                Ordering::Less => {}
            }
        }
        prev = Some(number);
    }
}

/// Post-stream validation: numbering monotonicity per sibling group and
/// required-content presence. Violations become warnings, never errors -
/// legal text is allowed to have irregular numbering (renumbered
/// amendments).
fn validate_tree(act: &Act) -> Vec<ParseWarning> {
    let mut warnings = Vec::new();

    check_sibling_numbers(
        act.parts.iter().map(|p| p.number.as_str()),
        Tier::Part,
        &mut warnings,
    );

    let chapter_groups = std::iter::once(&act.chapters)
        .chain(act.parts.iter().map(|p| &p.chapters));
    let mut section_groups: Vec<&Vec<Section>> = vec![&act.sections];
    for chapters in chapter_groups {
        check_sibling_numbers(
            chapters.iter().map(|c| c.number.as_str()),
            Tier::Chapter,
            &mut warnings,
        );
        for chapter in chapters {
            section_groups.push(&chapter.sections);
        }
    }

    for sections in section_groups {
        check_sibling_numbers(
            sections.iter().map(|s| s.section_number.as_str()),
            Tier::Section,
            &mut warnings,
        );
        for section in sections.iter() {
            if section.is_empty() {
                warnings.push(ParseWarning {
                    kind: WarningKind::EmptySection,
                    tier: Tier::Section,
                    number: section.section_number.clone(),
                    message: format!(
                        "section {} has no content and no children",
                        section.section_number
                    ),
                });
            }
            check_sibling_numbers(
                section.sub_sections.iter().map(|s| s.number.as_str()),
                Tier::SubSection,
                &mut warnings,
            );
            check_sibling_numbers(
                section.clauses.iter().map(|c| c.number.as_str()),
                Tier::Clause,
                &mut warnings,
            );
            for sub in &section.sub_sections {
                check_sibling_numbers(
                    sub.clauses.iter().map(|c| c.number.as_str()),
                    Tier::Clause,
                    &mut warnings,
                );
            }
        }
    }

    warnings
}
