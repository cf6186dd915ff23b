//! Chunk record definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MIN_CHUNK_CHARS;

/// A chunk of normalized document text with its page attribution.
///
/// Records are produced by the stream chunker and handed to the formatter.
/// The content is always trimmed and longer than [`MIN_CHUNK_CHARS`]
/// characters; shorter candidates never become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Trimmed chunk text
    pub content: String,

    /// Name of the document this chunk came from
    pub source: String,

    /// Page last seen in the document when the chunk was cut
    pub page: u32,

    /// Order of this chunk within its document (0-indexed)
    pub chunk_index: usize,
}

impl ChunkRecord {
    /// Build a record from an untrimmed candidate.
    ///
    /// Returns `None` when the trimmed candidate is too short to keep.
    pub fn from_candidate(candidate: &str, source: &str, page: u32, chunk_index: usize) -> Option<Self> {
        let content = candidate.trim();
        if content.chars().count() <= MIN_CHUNK_CHARS {
            return None;
        }

        Some(Self {
            content: content.to_string(),
            source: source.to_string(),
            page,
            chunk_index,
        })
    }

    /// Deterministic identifier derived from the source name and chunk index.
    ///
    /// The same document chunked twice yields the same identifiers.
    pub fn stable_id(&self) -> Uuid {
        let key = format!("{}#{}", self.source, self.chunk_index);
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
    }

    /// Length of the content in characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_candidate_dropped() {
        assert!(ChunkRecord::from_candidate("   twenty-one chars here", "a.pdf", 1, 0).is_some());
        assert!(ChunkRecord::from_candidate("  exactly twenty chars  ", "a.pdf", 1, 0).is_none());
        assert!(ChunkRecord::from_candidate("", "a.pdf", 1, 0).is_none());
    }

    #[test]
    fn test_candidate_is_trimmed() {
        let record = ChunkRecord::from_candidate("\n  some content that is long enough \n", "a.pdf", 3, 7).unwrap();
        assert_eq!(record.content, "some content that is long enough");
        assert_eq!(record.page, 3);
        assert_eq!(record.chunk_index, 7);
    }

    #[test]
    fn test_stable_id_is_deterministic() {
        let a = ChunkRecord::from_candidate("some content that is long enough", "a.pdf", 1, 0).unwrap();
        let b = a.clone();
        let mut c = a.clone();
        c.chunk_index = 1;

        assert_eq!(a.stable_id(), b.stable_id());
        assert_ne!(a.stable_id(), c.stable_id());
    }
}
