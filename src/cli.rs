//! Command-line interface for the ingest pipeline.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::chunker::ChunkEmitter;
use crate::config::ParserConfig;
use crate::error::{IngestError, Result};
use crate::fallback::{ExtractionPath, TextExtractor};
use crate::patterns::MarkerPatternSet;
use crate::pipeline::{parse_document, ParseStatus};
use crate::types::DocumentInput;
use crate::yaml::save_yaml;

/// Vidhi Ingest - Parse Nepali legislation into structured YAML archives.
#[derive(Parser)]
#[command(name = "vidhi-ingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which extraction path produced the input text.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PathArg {
    /// Layout-aware PDF text extraction.
    Pdf,
    /// Rendered-HTML text extraction.
    Html,
}

impl From<PathArg> for ExtractionPath {
    fn from(arg: PathArg) -> Self {
        match arg {
            PathArg::Pdf => ExtractionPath::PdfLayout,
            PathArg::Html => ExtractionPath::HtmlRendered,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an extracted-text file into an Act tree and write YAML.
    Parse {
        /// Path to the extracted UTF-8 text of the document
        file: PathBuf,

        /// URL the document was originally retrieved from
        #[arg(short, long)]
        source_url: String,

        /// Which extraction path produced the input text
        #[arg(short, long, value_enum, default_value = "pdf")]
        path: PathArg,

        /// Text from the other extraction path, tried when the primary
        /// parse finds too little structure
        #[arg(short, long)]
        alternate: Option<PathBuf>,

        /// Output directory for the YAML archive (default: acts/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write retrieval chunks as JSON lines to this file
        #[arg(short, long)]
        chunks: Option<PathBuf>,

        /// Split sections larger than this many bytes per subsection
        #[arg(long)]
        chunk_size_threshold: Option<usize>,
    },
}

/// Extractor backed by a pre-extracted alternate text file.
struct FileExtractor {
    alternate: Option<PathBuf>,
}

impl TextExtractor for FileExtractor {
    fn extract(&self, doc_id: &str, path: ExtractionPath) -> Result<String> {
        let Some(file) = &self.alternate else {
            return Err(IngestError::PathUnavailable {
                doc_id: doc_id.to_string(),
                path,
            });
        };
        Ok(fs::read_to_string(file)?)
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            file,
            source_url,
            path,
            alternate,
            output,
            chunks,
            chunk_size_threshold,
        } => parse_command(
            &file,
            &source_url,
            path,
            alternate,
            output.as_deref(),
            chunks.as_deref(),
            chunk_size_threshold,
        ),
    }
}

/// Execute the parse command.
fn parse_command(
    file: &Path,
    source_url: &str,
    path: PathArg,
    alternate: Option<PathBuf>,
    output: Option<&Path>,
    chunks: Option<&Path>,
    chunk_size_threshold: Option<usize>,
) -> Result<()> {
    let mut config = ParserConfig::default();
    if let Some(threshold) = chunk_size_threshold {
        config = config.with_chunk_size_threshold(threshold);
    }
    config.validate()?;

    let doc_id = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let text = fs::read_to_string(file)?;
    let input = DocumentInput::new(&doc_id, source_url, text, path.into())
        .with_retrieved_at(chrono::Utc::now());

    println!(
        "{} {} via {}",
        style("Parsing").bold(),
        style(&doc_id).cyan(),
        style(input.path).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Building hierarchy...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let extractor = FileExtractor { alternate };
    let patterns = MarkerPatternSet::nepali();
    let outcome = parse_document(&input, &extractor, &config, &patterns);

    pb.finish_and_clear();

    println!("  Title: {}", style(&outcome.act.title).green());
    if let Some(year) = &outcome.act.act_year {
        println!("  Year: {year}");
    }
    println!("  Sections: {}", outcome.act.section_count());
    println!("  Attempts: {}", outcome.attempts);
    if !outcome.warnings.is_empty() {
        println!(
            "  Warnings: {}",
            style(outcome.warnings.len()).yellow().bold()
        );
    }
    match outcome.status {
        ParseStatus::Parsed => {}
        ParseStatus::Unparseable => println!(
            "  {} document needs manual review",
            style("Unparseable:").yellow().bold()
        ),
        ParseStatus::Empty => {
            println!("  {} no text to parse", style("Empty:").yellow().bold());
            return Ok(());
        }
    }

    let output_base = output.unwrap_or(Path::new("acts"));
    let output_path = save_yaml(&outcome.act, output_base)?;
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    if let Some(chunks_path) = chunks {
        let count = write_chunks(&outcome.act, &config, chunks_path)?;
        println!(
            "{} {} chunks to {}",
            style("Wrote:").green().bold(),
            count,
            chunks_path.display()
        );
    }

    Ok(())
}

/// Write retrieval chunks as JSON lines. Returns the chunk count.
fn write_chunks(act: &crate::types::Act, config: &ParserConfig, path: &Path) -> Result<usize> {
    let emitter = ChunkEmitter::new(act, config);
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0usize;
    for chunk in emitter.iter() {
        let line = serde_json::to_string(&chunk)?;
        writeln!(writer, "{line}")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
