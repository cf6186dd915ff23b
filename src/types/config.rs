//! Configuration types for chunking and packing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    BOUNDARY_SEARCH_RADIUS, DEFAULT_BASE_NAME, DEFAULT_OVERLAP_WINDOW, DEFAULT_TARGET_SIZE,
    MAX_BUNDLE_SIZE,
};

/// Run-wide packing configuration.
///
/// All values are fixed for the duration of a run; nothing here is
/// adjusted per document or per chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingConfig {
    /// Target chunk size in characters
    pub target_size: usize,

    /// Characters carried over from the end of one chunk into the next
    pub overlap_window: usize,

    /// Maximum bundle size in bytes
    pub max_bundle_size: usize,

    /// Prefix for bundle and manifest file names
    pub base_name: String,

    /// Directory bundles are written to
    pub output_dir: PathBuf,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            overlap_window: DEFAULT_OVERLAP_WINDOW,
            max_bundle_size: MAX_BUNDLE_SIZE,
            base_name: DEFAULT_BASE_NAME.to_string(),
            output_dir: PathBuf::from("./out"),
        }
    }
}

impl PackingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let config = Self {
            target_size: std::env::var("TARGET_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TARGET_SIZE),
            overlap_window: std::env::var("OVERLAP_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_OVERLAP_WINDOW),
            max_bundle_size: std::env::var("MAX_BUNDLE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_BUNDLE_SIZE),
            base_name: std::env::var("BUNDLE_BASE_NAME")
                .unwrap_or_else(|_| DEFAULT_BASE_NAME.to_string()),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./out")),
        };

        config.validated()
    }

    /// Replace inconsistent values with defaults.
    ///
    /// A cut must always land past the overlap window, otherwise the
    /// chunker would retain its whole buffer and never advance.
    pub fn validated(mut self) -> Self {
        if self.target_size <= self.overlap_window + BOUNDARY_SEARCH_RADIUS {
            warn!(
                target_size = self.target_size,
                overlap_window = self.overlap_window,
                "Overlap window too large for target size, using defaults"
            );
            self.target_size = DEFAULT_TARGET_SIZE;
            self.overlap_window = DEFAULT_OVERLAP_WINDOW;
        }

        if self.max_bundle_size == 0 {
            warn!("Bundle size cap of zero is not usable, using default");
            self.max_bundle_size = MAX_BUNDLE_SIZE;
        }

        if self.base_name.trim().is_empty() {
            self.base_name = DEFAULT_BASE_NAME.to_string();
        }

        self
    }

    /// Chunker settings derived from this configuration.
    pub fn chunker(&self) -> ChunkerConfig {
        ChunkerConfig {
            target_size: self.target_size,
            overlap_window: self.overlap_window,
        }
    }
}

/// Settings for a single stream chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Target chunk size in characters
    pub target_size: usize,

    /// Characters retained before each non-final cut
    pub overlap_window: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            overlap_window: DEFAULT_OVERLAP_WINDOW,
        }
    }
}

impl ChunkerConfig {
    /// Set the target size.
    pub fn with_target(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    /// Set the overlap window.
    pub fn with_overlap(mut self, overlap_window: usize) -> Self {
        self.overlap_window = overlap_window;
        self
    }

    /// Buffer length at which a non-final cut is performed.
    pub fn cut_threshold(&self) -> usize {
        self.target_size + self.overlap_window
    }
}

/// Service-level configuration for the HTTP front end.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the service listens on
    pub port: u16,

    /// Directory job file paths are resolved against
    pub input_dir: PathBuf,

    /// Packing configuration applied to every job
    pub packing: PackingConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3017),
            input_dir: std::env::var("INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./in")),
            packing: PackingConfig::from_env(),
        }
    }
}
