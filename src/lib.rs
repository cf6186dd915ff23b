//! Docpack Library
//!
//! Page-aware streaming chunker and size-capped bundle packer for RAG
//! ingestion. Documents are extracted page by page, normalized, cut into
//! overlapping chunks and packed into plain-text or NDJSON bundles.

pub mod api;
pub mod chunkers;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod output;
pub mod pipeline;
pub mod types;

pub use chunkers::{normalize, PageTracker, StreamChunker};
pub use output::{BundlePacker, Manifest, OutputFormat, PackOutput};
pub use pipeline::{CancelToken, PipelineDriver, RunReport};
pub use types::{ChunkRecord, ChunkerConfig, DocumentStatus, PackingConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunkers::*;
    pub use crate::error::*;
    pub use crate::extract::{DefaultExtractor, PageExtractor, PageSource};
    pub use crate::output::*;
    pub use crate::pipeline::*;
    pub use crate::types::*;
}

/// Default target chunk size in characters
pub const DEFAULT_TARGET_SIZE: usize = 1500;

/// Default overlap window carried into the next chunk, in characters
pub const DEFAULT_OVERLAP_WINDOW: usize = 200;

/// Radius of the boundary search window around the target offset
pub const BOUNDARY_SEARCH_RADIUS: usize = 100;

/// Chunks of this many characters or fewer are dropped
pub const MIN_CHUNK_CHARS: usize = 20;

/// Maximum bundle size in bytes (38.5 MiB)
pub const MAX_BUNDLE_SIZE: usize = 38 * 1024 * 1024 + 512 * 1024;

/// Default base name for bundle files
pub const DEFAULT_BASE_NAME: &str = "DOCPACK";
