//! PDF page text extraction with lopdf.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::PageSource;
use crate::error::ExtractError;

/// Pages of a PDF document.
pub struct PdfPages {
    document: Document,
    page_numbers: Vec<u32>,
}

impl PdfPages {
    /// Load a PDF document from disk.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let document = Document::load(path).map_err(|source| ExtractError::Pdf {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_document(document))
    }

    /// Wrap an already-loaded document.
    pub fn from_document(document: Document) -> Self {
        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        debug!(pages = page_numbers.len(), "Loaded PDF document");
        Self {
            document,
            page_numbers,
        }
    }
}

impl PageSource for PdfPages {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        let page_number = self.page_numbers.get(index).ok_or(ExtractError::Page {
            page: index + 1,
            reason: "page out of range".to_string(),
        })?;

        self.document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Page {
                page: index + 1,
                reason: e.to_string(),
            })
    }
}
