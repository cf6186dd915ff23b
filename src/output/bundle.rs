//! Size-capped bundle packing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::formatter::{FormattedUnit, OutputFormat};

/// A sealed, named bundle of formatted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// 1-based sequence number in sealing order
    pub sequence: usize,
    /// File name, `{BASE}_PART_{seq:03}.{ext}`
    pub name: String,
    /// Concatenated formatted records
    pub content: String,
    /// Content size in bytes
    pub size_bytes: usize,
    /// Number of records in the bundle
    pub record_count: usize,
}

/// Summary over all sealed bundles of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Output representation of every bundle
    pub format: OutputFormat,
    /// Number of sealed bundles
    pub total_files: usize,
    /// Sum of bundle sizes in bytes
    pub total_size_bytes: usize,
    /// Sum of bundle record counts
    pub total_chunks_approx: usize,
    /// When packing finished
    pub created_at: DateTime<Utc>,
}

impl Manifest {
    /// Summarize a list of sealed bundles.
    pub fn for_bundles(format: OutputFormat, bundles: &[Bundle]) -> Self {
        Self {
            format,
            total_files: bundles.len(),
            total_size_bytes: bundles.iter().map(|b| b.size_bytes).sum(),
            total_chunks_approx: bundles.iter().map(|b| b.record_count).sum(),
            created_at: Utc::now(),
        }
    }
}

/// Sealed bundles plus their manifest.
#[derive(Debug, Clone)]
pub struct PackOutput {
    /// Bundles in sealing order
    pub bundles: Vec<Bundle>,
    /// Summary over `bundles`
    pub manifest: Manifest,
}

/// The bundle currently being filled.
#[derive(Debug, Default)]
struct OpenBundle {
    content: String,
    size_bytes: usize,
    record_count: usize,
}

impl OpenBundle {
    fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    fn push(&mut self, unit: &FormattedUnit) {
        self.content.push_str(&unit.text);
        self.size_bytes += unit.size_bytes();
        self.record_count += 1;
    }
}

/// Packs formatted units into bundles no larger than a byte cap.
///
/// A unit that would push the open bundle past the cap seals it and starts
/// the next bundle. Units are never split, so a single unit larger than the
/// cap becomes the sole content of its own bundle. Bundles span document
/// boundaries; only the end of the whole queue seals a partial bundle.
pub struct BundlePacker {
    format: OutputFormat,
    base_name: String,
    max_bundle_size: usize,
    current: OpenBundle,
    sealed: Vec<Bundle>,
}

impl BundlePacker {
    /// Create a packer for one run.
    pub fn new(format: OutputFormat, base_name: impl Into<String>, max_bundle_size: usize) -> Self {
        Self {
            format,
            base_name: base_name.into(),
            max_bundle_size,
            current: OpenBundle::default(),
            sealed: Vec::new(),
        }
    }

    /// Output format of the bundles.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Bundles sealed so far.
    pub fn sealed(&self) -> &[Bundle] {
        &self.sealed
    }

    /// Records packed so far, sealed or not.
    pub fn record_count(&self) -> usize {
        self.sealed.iter().map(|b| b.record_count).sum::<usize>() + self.current.record_count
    }

    /// Add one formatted unit.
    pub fn push(&mut self, unit: FormattedUnit) {
        let len = unit.size_bytes();
        if !self.current.is_empty() && self.current.size_bytes + len > self.max_bundle_size {
            self.seal();
        }
        self.current.push(&unit);
    }

    /// Seal the open bundle, if any, and return everything packed.
    pub fn finish(mut self) -> PackOutput {
        if !self.current.is_empty() {
            self.seal();
        }

        let manifest = Manifest::for_bundles(self.format, &self.sealed);
        info!(
            format = %self.format,
            bundles = manifest.total_files,
            size_bytes = manifest.total_size_bytes,
            records = manifest.total_chunks_approx,
            "Packing complete"
        );

        PackOutput {
            bundles: self.sealed,
            manifest,
        }
    }

    /// Name of the bundle with the given sequence number.
    pub fn bundle_name(&self, sequence: usize) -> String {
        format!("{}_PART_{:03}.{}", self.base_name, sequence, self.format.extension())
    }

    fn seal(&mut self) {
        let open = std::mem::take(&mut self.current);
        let sequence = self.sealed.len() + 1;
        let bundle = Bundle {
            sequence,
            name: self.bundle_name(sequence),
            content: open.content,
            size_bytes: open.size_bytes,
            record_count: open.record_count,
        };

        debug!(
            bundle = %bundle.name,
            size_bytes = bundle.size_bytes,
            records = bundle.record_count,
            "Sealed bundle"
        );
        self.sealed.push(bundle);
    }
}
