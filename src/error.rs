//! Error types for the ingestion core.
//!
//! Parse irregularities (duplicate numbering, thin structure) are *not*
//! errors: they surface as [`crate::types::ParseWarning`]s on the parse
//! outcome so batch ingestion continues past a bad document. `IngestError`
//! is reserved for genuine caller failures: invalid configuration,
//! extraction collaborators reporting failure, and IO/serialization in the
//! persistence layer.

use thiserror::Error;

use crate::fallback::ExtractionPath;

/// Main error type for the ingestion library.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A marker pattern in the locale table failed to compile.
    #[error("Invalid marker pattern for tier {tier}: {source}")]
    InvalidPattern {
        tier: String,
        #[source]
        source: regex::Error,
    },

    /// The external text-extraction collaborator failed for a document.
    #[error("Text extraction failed for {doc_id} via {path}: {reason}")]
    Extraction {
        doc_id: String,
        path: ExtractionPath,
        reason: String,
    },

    /// The requested extraction path has no representation for this document.
    #[error("No {path} representation available for {doc_id}")]
    PathUnavailable {
        doc_id: String,
        path: ExtractionPath,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_display() {
        let err = IngestError::Extraction {
            doc_id: "muluki-criminal-code-2074".to_string(),
            path: ExtractionPath::HtmlRendered,
            reason: "empty body".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("muluki-criminal-code-2074"));
        assert!(msg.contains("empty body"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = IngestError::InvalidConfig("chunk_size_threshold must be > 0".to_string());
        assert!(err.to_string().contains("chunk_size_threshold"));
    }
}
