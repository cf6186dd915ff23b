//! Page-oriented text extraction.
//!
//! Extraction is the boundary to the outside world: an extractor opens a
//! document and hands out the raw text of each page on demand so a single
//! unreadable page can be skipped without losing the rest of the document.

mod pdf;
mod text;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;

pub use pdf::PdfPages;
pub use text::TextPages;

use crate::error::ExtractError;

/// An opened document that yields raw page text.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw text of the page at `index` (0-based).
    fn page_text(&self, index: usize) -> Result<String, ExtractError>;
}

/// Opens documents for page extraction.
pub trait PageExtractor: Send + Sync {
    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>, ExtractError>;
}

/// Extractor that picks a backend from the file extension.
///
/// `.txt` and `.md` files are read as UTF-8 with form feeds separating
/// pages; `.pdf` files go through lopdf. Anything else is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl PageExtractor for DefaultExtractor {
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("md") => Ok(Box::new(TextPages::open(path)?)),
            Some("pdf") => Ok(Box::new(PdfPages::open(path)?)),
            _ => Err(ExtractError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}
