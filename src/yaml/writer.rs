//! YAML writer for parsed Act trees.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::text::{normalize_text, should_wrap_text, wrap_text_default};
use crate::error::Result;
use crate::types::{Act, Chapter, Clause, Part, Section, SubSection};

/// Clause representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlClause {
    number: String,
    text: String,
}

/// SubSection representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlSubSection {
    number: String,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    clauses: Vec<YamlClause>,
}

/// Section representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlSection {
    number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sub_sections: Vec<YamlSubSection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    clauses: Vec<YamlClause>,
}

/// Chapter representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlChapter {
    number: String,
    title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sections: Vec<YamlSection>,
}

/// Part representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlPart {
    number: String,
    title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    chapters: Vec<YamlChapter>,
}

/// Full act representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlAct {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<String>,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retrieved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    preamble: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parts: Vec<YamlPart>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    chapters: Vec<YamlChapter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sections: Vec<YamlSection>,
}

/// Normalize provision text and wrap it when it runs long.
fn render_text(text: &str) -> String {
    let normalized = normalize_text(text);
    if should_wrap_text(&normalized) {
        wrap_text_default(&normalized)
    } else {
        normalized
    }
}

fn convert_clause(clause: &Clause) -> YamlClause {
    YamlClause {
        number: clause.number.clone(),
        text: render_text(&clause.content),
    }
}

fn convert_sub_section(sub: &SubSection) -> YamlSubSection {
    YamlSubSection {
        number: sub.number.clone(),
        text: render_text(&sub.content),
        clauses: sub.clauses.iter().map(convert_clause).collect(),
    }
}

fn convert_section(section: &Section) -> YamlSection {
    YamlSection {
        number: section.section_number.clone(),
        title: section.title.clone(),
        text: render_text(&section.content),
        sub_sections: section.sub_sections.iter().map(convert_sub_section).collect(),
        clauses: section.clauses.iter().map(convert_clause).collect(),
    }
}

fn convert_chapter(chapter: &Chapter) -> YamlChapter {
    YamlChapter {
        number: chapter.number.clone(),
        title: chapter.title.clone(),
        sections: chapter.sections.iter().map(convert_section).collect(),
    }
}

fn convert_part(part: &Part) -> YamlPart {
    YamlPart {
        number: part.number.clone(),
        title: part.title.clone(),
        chapters: part.chapters.iter().map(convert_chapter).collect(),
    }
}

/// Generate the YAML archive structure from an Act tree.
fn generate_yaml_struct(act: &Act) -> YamlAct {
    YamlAct {
        title: act.title.clone(),
        year: act.act_year.clone(),
        url: act.source_url.clone(),
        retrieved_at: act.retrieved_at,
        preamble: render_text(&act.preamble),
        parts: act.parts.iter().map(convert_part).collect(),
        chapters: act.chapters.iter().map(convert_chapter).collect(),
        sections: act.sections.iter().map(convert_section).collect(),
    }
}

/// Generate a YAML string from an Act tree.
pub fn generate_yaml(act: &Act) -> Result<String> {
    let yaml_struct = generate_yaml_struct(act);
    let yaml_string = serde_yaml_ng::to_string(&yaml_struct)?;

    // Add document start marker and clean up trailing whitespace
    let lines: Vec<&str> = yaml_string.lines().map(|l| l.trim_end()).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Save an Act tree as a YAML file named after its title slug.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then
/// renames, so a crash mid-write never corrupts an existing archive file.
///
/// Returns the path to the saved file.
pub fn save_yaml(act: &Act, output_base: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_base)?;

    let slug = act.to_slug();
    let output_file = output_base.join(format!("{slug}.yaml"));
    let temp_file = output_base.join(format!(".{slug}.yaml.tmp"));

    let content = generate_yaml(act)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;

    Ok(output_file)
}
