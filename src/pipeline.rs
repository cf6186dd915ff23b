//! Pipeline driver: extraction, chunking, formatting and packing.
//!
//! Documents are processed strictly one at a time in queue order. Each
//! document gets a fresh chunker; the bundle packer lives for the whole run
//! so bundles fill across document boundaries.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunkers::{page_sentinel, StreamChunker};
use crate::error::{DocumentError, OutputError};
use crate::extract::{DefaultExtractor, PageExtractor};
use crate::output::{BundlePacker, BundleWriter, OutputFormat, PackOutput, RecordFormatter};
use crate::types::{ChunkRecord, DocumentReport, DocumentStatus, PackingConfig};

/// Cooperative cancellation flag, checked before every document and page.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one run over a document queue.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Output representation used for the run
    pub format: OutputFormat,
    /// Per-document outcome, in queue order
    pub documents: Vec<DocumentReport>,
    /// Sealed bundles and manifest
    pub output: PackOutput,
    /// Whether the run stopped early on request
    pub cancelled: bool,
}

impl RunReport {
    /// Total chunk records emitted.
    pub fn total_chunks(&self) -> usize {
        self.documents.iter().map(|d| d.chunks).sum()
    }

    /// Number of documents that ended in the error state.
    pub fn failed_documents(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| matches!(d.status, DocumentStatus::Error(_)))
            .count()
    }
}

/// Sequences documents through extraction, chunking and packing.
pub struct PipelineDriver<E = DefaultExtractor> {
    config: PackingConfig,
    extractor: E,
    cancel: CancelToken,
}

impl PipelineDriver<DefaultExtractor> {
    /// Create a driver using the extension-based default extractor.
    pub fn new(config: PackingConfig) -> Self {
        Self::with_extractor(config, DefaultExtractor)
    }
}

impl<E: PageExtractor> PipelineDriver<E> {
    /// Create a driver with a custom extractor.
    pub fn with_extractor(config: PackingConfig, extractor: E) -> Self {
        Self {
            config,
            extractor,
            cancel: CancelToken::new(),
        }
    }

    /// Share an existing cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this driver's runs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Configuration in effect.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Process the queue into plain-text bundles.
    pub fn run_text(&self, files: &[PathBuf]) -> RunReport {
        self.run(files, OutputFormat::Text)
    }

    /// Process the queue into NDJSON bundles.
    pub fn run_structured(&self, files: &[PathBuf]) -> RunReport {
        self.run(files, OutputFormat::Structured)
    }

    /// Process the queue with the default formatter for `format`.
    pub fn run(&self, files: &[PathBuf], format: OutputFormat) -> RunReport {
        let formatter = format.formatter();
        self.run_with(files, format, formatter.as_ref(), |_, _| {})
    }

    /// Process the queue, reporting every document status change.
    ///
    /// `on_update` receives the queue index and the updated report each time
    /// a document enters `Processing` and again when it finishes.
    pub fn run_with<F>(
        &self,
        files: &[PathBuf],
        format: OutputFormat,
        formatter: &dyn RecordFormatter,
        mut on_update: F,
    ) -> RunReport
    where
        F: FnMut(usize, &DocumentReport),
    {
        let mut documents: Vec<DocumentReport> =
            files.iter().cloned().map(DocumentReport::pending).collect();
        let mut packer = BundlePacker::new(
            format,
            self.config.base_name.clone(),
            self.config.max_bundle_size,
        );

        info!(documents = documents.len(), format = %format, "Starting run");

        let mut cancelled = false;
        for (index, report) in documents.iter_mut().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            report.status = DocumentStatus::Processing;
            on_update(index, report);
            info!(document = %report.name, "Processing document");

            match self.process_document(report, formatter, &mut packer) {
                Ok(()) => {
                    report.status = DocumentStatus::Done;
                    info!(
                        document = %report.name,
                        pages = report.pages_read,
                        skipped = report.pages_skipped,
                        chunks = report.chunks,
                        "Document done"
                    );
                }
                Err(e) => {
                    if matches!(e, DocumentError::Cancelled) {
                        cancelled = true;
                    }
                    error!(document = %report.name, error = %e, "Document failed");
                    report.status = DocumentStatus::Error(e.to_string());
                }
            }
            on_update(index, report);
        }

        if cancelled {
            warn!("Run cancelled, sealing what was packed so far");
        }

        let report = RunReport {
            format,
            documents,
            output: packer.finish(),
            cancelled,
        };

        info!(
            chunks = report.total_chunks(),
            failed = report.failed_documents(),
            bundles = report.output.bundles.len(),
            "Run complete"
        );

        report
    }

    /// Write a run's bundles and manifest to the configured directory.
    pub fn write_output(&self, report: &RunReport) -> Result<Vec<PathBuf>, OutputError> {
        BundleWriter::new(&self.config.output_dir, self.config.base_name.clone())
            .write(&report.output)
    }

    fn process_document(
        &self,
        report: &mut DocumentReport,
        formatter: &dyn RecordFormatter,
        packer: &mut BundlePacker,
    ) -> Result<(), DocumentError> {
        let source = self.extractor.open(&report.path)?;
        let mut chunker = StreamChunker::new(report.name.clone(), self.config.chunker());

        for index in 0..source.page_count() {
            if self.cancel.is_cancelled() {
                return Err(DocumentError::Cancelled);
            }

            let page = (index + 1) as u32;
            let segment = match source.page_text(index) {
                Ok(text) => {
                    report.pages_read += 1;
                    format!("{}\n{}", text, page_sentinel(page))
                }
                Err(e) => {
                    report.pages_skipped += 1;
                    warn!(document = %report.name, page, error = %e, "Skipping unreadable page");
                    // The sentinel alone keeps page attribution in step with the source.
                    page_sentinel(page)
                }
            };

            let records = chunker.process_text(&segment);
            pack(records, formatter, packer, report)?;
        }

        let records = chunker.flush();
        pack(records, formatter, packer, report)
    }
}

fn pack(
    records: Vec<ChunkRecord>,
    formatter: &dyn RecordFormatter,
    packer: &mut BundlePacker,
    report: &mut DocumentReport,
) -> Result<(), DocumentError> {
    for record in records {
        let unit = formatter
            .format(&record)
            .map_err(|source| DocumentError::Format {
                chunk_index: record.chunk_index,
                source,
            })?;
        packer.push(unit);
        report.chunks += 1;
    }
    Ok(())
}
