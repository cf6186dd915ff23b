//! Error types for extraction, formatting and output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while reading pages from a source document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load PDF {path}: {source}")]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("unsupported input format for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to extract text for page {page}: {reason}")]
    Page { page: usize, reason: String },
}

/// Errors emitted while rendering a chunk record.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to encode structured record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reasons a single document ends in the error state.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("chunk {chunk_index} could not be formatted: {source}")]
    Format {
        chunk_index: usize,
        #[source]
        source: FormatError,
    },

    #[error("run cancelled")]
    Cancelled,
}

/// Errors emitted while writing bundles and the manifest.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
