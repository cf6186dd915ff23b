//! Current-page tracking for a single document.

/// Tracks the last page number observed in a document's stream.
///
/// Only one value is kept, never a range. Chunks read the tracker when they
/// are cut, so a chunk whose text spans a page transition is attributed to
/// the page last seen before the cut rather than the page its first
/// characters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTracker {
    last_page_seen: u32,
}

impl PageTracker {
    /// Create a tracker starting at page 1.
    pub fn new() -> Self {
        Self { last_page_seen: 1 }
    }

    /// Record a page number reported by the normalizer.
    pub fn observe(&mut self, page: Option<u32>) {
        if let Some(page) = page {
            self.last_page_seen = page;
        }
    }

    /// Page currently in effect.
    pub fn current(&self) -> u32 {
        self.last_page_seen
    }
}

impl Default for PageTracker {
    fn default() -> Self {
        Self::new()
    }
}
