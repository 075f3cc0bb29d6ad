//! Fallback extraction seam.
//!
//! Every document reaches the pipeline as text from one extraction path
//! (layout-aware PDF extraction or rendered HTML text). When that text
//! yields too little recognizable structure, the pipeline asks the external
//! extraction collaborator for the *other* path's rendition of the same
//! document and retries exactly once. The collaborator is behind the
//! [`TextExtractor`] trait; the pipeline itself never touches the network or
//! the filesystem.

use crate::error::{IngestError, Result};

/// Which extraction path produced a text blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    /// Layout-aware text extraction of a PDF.
    PdfLayout,

    /// Text derived from a rendered HTML page.
    HtmlRendered,
}

impl ExtractionPath {
    /// The other extraction path, used for the single fallback attempt.
    #[must_use]
    pub fn alternate(&self) -> Self {
        match self {
            Self::PdfLayout => Self::HtmlRendered,
            Self::HtmlRendered => Self::PdfLayout,
        }
    }

    /// Short identifier for logs and errors.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PdfLayout => "pdf_layout",
            Self::HtmlRendered => "html_rendered",
        }
    }
}

impl std::fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface to the external text-extraction collaborator.
///
/// `extract` returns the text rendition of a document via the requested
/// path, or an error when that rendition does not exist or cannot be
/// produced. A failed fallback extraction is not fatal to the pipeline; the
/// document is simply flagged unparseable with the best-effort tree.
pub trait TextExtractor {
    /// Produce the text of `doc_id` via the given extraction path.
    fn extract(&self, doc_id: &str, path: ExtractionPath) -> Result<String>;
}

/// In-memory extractor over pre-fetched renditions.
///
/// The usual carrier in tests and in the CLI, where acquisition has already
/// happened and at most one alternate rendition is on hand.
#[derive(Debug, Default, Clone)]
pub struct InMemoryExtractor {
    pdf_layout: Option<String>,
    html_rendered: Option<String>,
}

impl InMemoryExtractor {
    /// Create an extractor with no renditions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the PDF-layout rendition.
    #[must_use]
    pub fn with_pdf_layout(mut self, text: impl Into<String>) -> Self {
        self.pdf_layout = Some(text.into());
        self
    }

    /// Supply the rendered-HTML rendition.
    #[must_use]
    pub fn with_html_rendered(mut self, text: impl Into<String>) -> Self {
        self.html_rendered = Some(text.into());
        self
    }
}

impl TextExtractor for InMemoryExtractor {
    fn extract(&self, doc_id: &str, path: ExtractionPath) -> Result<String> {
        let text = match path {
            ExtractionPath::PdfLayout => self.pdf_layout.as_ref(),
            ExtractionPath::HtmlRendered => self.html_rendered.as_ref(),
        };
        text.cloned().ok_or_else(|| IngestError::PathUnavailable {
            doc_id: doc_id.to_string(),
            path,
        })
    }
}
