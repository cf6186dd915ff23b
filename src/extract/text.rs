//! Plain-text documents with form-feed page breaks.

use std::fs;
use std::path::Path;

use super::PageSource;
use crate::error::ExtractError;

/// Form feed, the conventional page separator in text dumps.
const PAGE_BREAK: char = '\u{000C}';

/// Pages of a UTF-8 text file.
#[derive(Debug, Clone)]
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    /// Read a text file and split it into pages.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let content = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&content))
    }

    /// Split already-loaded text into pages.
    pub fn from_text(content: &str) -> Self {
        let mut pages: Vec<String> = content.split(PAGE_BREAK).map(String::from).collect();
        // A trailing form feed closes the last page rather than opening a new one.
        if pages.len() > 1 && pages.last().map_or(false, |p| p.is_empty()) {
            pages.pop();
        }
        Self { pages }
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        self.pages.get(index).cloned().ok_or(ExtractError::Page {
            page: index + 1,
            reason: "page out of range".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_splits_on_form_feed() {
        let pages = TextPages::from_text("first\u{000C}second\u{000C}third\u{000C}");
        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages.page_text(1).unwrap(), "second");
    }

    #[test]
    fn test_single_page() {
        let pages = TextPages::from_text("only page");
        assert_eq!(pages.page_count(), 1);
        assert_eq!(pages.page_text(0).unwrap(), "only page");
    }

    #[test]
    fn test_out_of_range_page() {
        let pages = TextPages::from_text("only page");
        assert!(matches!(pages.page_text(3), Err(ExtractError::Page { page: 4, .. })));
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(TextPages::open(&path), Err(ExtractError::Io { .. })));
    }
}
