//! Rendering of chunk records into their wire representations.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::chunkers::{CharRatioEstimator, TokenEstimator};
use crate::error::FormatError;
use crate::types::ChunkRecord;

/// Output representation, chosen once for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain-text blocks with a metadata header
    #[default]
    Text,
    /// Newline-delimited JSON records
    Structured,
}

impl OutputFormat {
    /// File extension of bundles in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Structured => "ndjson",
        }
    }

    /// Formatter for this representation with default settings.
    pub fn formatter(&self) -> Box<dyn RecordFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Structured => Box::new(StructuredFormatter::new()),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Structured => write!(f, "structured"),
        }
    }
}

/// A rendered record ready for packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedUnit {
    /// Encoded text, including its trailing separator
    pub text: String,
}

impl FormattedUnit {
    /// Wrap rendered text.
    pub fn new(text: String) -> Self {
        Self { text }
    }

    /// Size of the unit in UTF-8 bytes.
    pub fn size_bytes(&self) -> usize {
        self.text.len()
    }
}

/// Renders one chunk record.
pub trait RecordFormatter: Send + Sync {
    /// Format a single record.
    fn format(&self, record: &ChunkRecord) -> Result<FormattedUnit, FormatError>;
}

/// Plain-text block formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl RecordFormatter for TextFormatter {
    fn format(&self, record: &ChunkRecord) -> Result<FormattedUnit, FormatError> {
        Ok(FormattedUnit::new(format!(
            "[METADATA: Source=\"{}\" | Page={}]\n---\n{}\n---\n\n",
            record.source, record.page, record.content
        )))
    }
}

/// One NDJSON line.
#[derive(Debug, Serialize)]
struct StructuredRecord<'a> {
    id: String,
    source: &'a str,
    page: u32,
    content: &'a str,
    tokens: usize,
    created_at: String,
}

/// NDJSON formatter.
///
/// Identifiers are derived from the source name and chunk index, so the
/// same input always yields the same ids. The timestamp can be pinned for
/// reproducible output.
pub struct StructuredFormatter {
    estimator: Box<dyn TokenEstimator>,
    fixed_time: Option<DateTime<Utc>>,
}

impl StructuredFormatter {
    /// Create a formatter with the default `chars / 4` estimator.
    pub fn new() -> Self {
        Self {
            estimator: Box::new(CharRatioEstimator::default()),
            fixed_time: None,
        }
    }

    /// Use a different token estimator.
    pub fn with_estimator(mut self, estimator: Box<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Stamp every record with the given time instead of the wall clock.
    pub fn with_fixed_time(mut self, time: DateTime<Utc>) -> Self {
        self.fixed_time = Some(time);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_time.unwrap_or_else(Utc::now)
    }
}

impl Default for StructuredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFormatter for StructuredFormatter {
    fn format(&self, record: &ChunkRecord) -> Result<FormattedUnit, FormatError> {
        let line = StructuredRecord {
            id: record.stable_id().to_string(),
            source: &record.source,
            page: record.page,
            content: &record.content,
            tokens: self.estimator.estimate(&record.content),
            created_at: self.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let mut text = serde_json::to_string(&line)?;
        text.push('\n');
        Ok(FormattedUnit::new(text))
    }
}
