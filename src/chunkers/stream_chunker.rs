//! Incremental, page-aware chunker for streamed document text.

use std::collections::VecDeque;

use tracing::{debug, warn};

use super::base::is_sentence_terminator;
use super::normalizer::normalize;
use super::page_tracker::PageTracker;
use crate::types::{ChunkRecord, ChunkerConfig};
use crate::BOUNDARY_SEARCH_RADIUS;

/// Streaming chunker that owns the text buffer of one document.
///
/// Text is fed page by page through [`StreamChunker::process_text`]; once
/// the buffer holds `target_size + overlap_window` characters a chunk is
/// cut near `target_size`, preferring a sentence end and then a line break
/// inside a ±100 character window. The last `overlap_window` characters
/// before each cut stay in the buffer so the next chunk starts with some
/// context. [`StreamChunker::flush`] drains whatever is left at the end of
/// the document.
///
/// All offsets are character offsets, so multi-byte text is never split
/// inside a code point.
pub struct StreamChunker {
    source: String,
    config: ChunkerConfig,
    buffer: VecDeque<char>,
    pages: PageTracker,
    next_index: usize,
    dropped: usize,
}

impl StreamChunker {
    /// Create a chunker for the named document.
    pub fn new(source: impl Into<String>, config: ChunkerConfig) -> Self {
        Self {
            source: source.into(),
            config,
            buffer: VecDeque::new(),
            pages: PageTracker::new(),
            next_index: 0,
            dropped: 0,
        }
    }

    /// Name of the document being chunked.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Page currently in effect.
    pub fn current_page(&self) -> u32 {
        self.pages.current()
    }

    /// Characters waiting in the buffer.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Records emitted so far.
    pub fn emitted(&self) -> usize {
        self.next_index
    }

    /// Candidates dropped for being too short.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Normalize a raw segment, append it and cut every chunk that is ready.
    pub fn process_text(&mut self, segment: &str) -> Vec<ChunkRecord> {
        let normalized = normalize(segment);
        self.pages.observe(normalized.page);
        self.buffer.extend(normalized.text.chars());

        let mut records = Vec::new();
        while self.buffer.len() >= self.config.cut_threshold() {
            let end = self.find_cut();
            let keep_from = end.saturating_sub(self.config.overlap_window);
            if keep_from == 0 {
                warn!(
                    source = %self.source,
                    end,
                    overlap_window = self.config.overlap_window,
                    "Cut would not advance the buffer, deferring to flush"
                );
                break;
            }

            self.emit(end, &mut records);
            self.buffer.drain(..keep_from);
        }

        records
    }

    /// Drain the buffer completely.
    ///
    /// A remainder that fits in `target_size + overlap_window` characters is
    /// emitted as one chunk; anything longer is cut at `target_size` without
    /// boundary search and without overlap.
    pub fn flush(&mut self) -> Vec<ChunkRecord> {
        let mut records = Vec::new();

        while !self.buffer.is_empty() {
            let len = self.buffer.len();
            let end = if len <= self.config.cut_threshold() {
                len
            } else {
                self.config.target_size.max(1)
            };

            self.emit(end, &mut records);
            self.buffer.drain(..end);
        }

        debug!(
            source = %self.source,
            emitted = self.next_index,
            dropped = self.dropped,
            "Flushed chunk buffer"
        );

        records
    }

    /// Choose the end offset of the next non-final chunk.
    fn find_cut(&self) -> usize {
        let len = self.buffer.len();
        let candidate = self.config.target_size.min(len);
        let lo = candidate.saturating_sub(BOUNDARY_SEARCH_RADIUS);
        let hi = (candidate + BOUNDARY_SEARCH_RADIUS).min(len);

        let sentence_end = (lo..hi).find(|&i| {
            is_sentence_terminator(self.buffer[i])
                && self.buffer.get(i + 1).map_or(false, |c| c.is_whitespace())
        });
        if let Some(i) = sentence_end {
            return i + 1;
        }

        if let Some(i) = (lo..hi).find(|&i| self.buffer[i] == '\n') {
            return i;
        }

        candidate
    }

    /// Turn `buffer[..end]` into a record if it is long enough.
    fn emit(&mut self, end: usize, records: &mut Vec<ChunkRecord>) {
        let candidate: String = self.buffer.range(..end).collect();
        let page = self.pages.current();

        match ChunkRecord::from_candidate(&candidate, &self.source, page, self.next_index) {
            Some(record) => {
                debug!(
                    source = %self.source,
                    page,
                    chunk_index = self.next_index,
                    chars = record.len(),
                    "Cut chunk"
                );
                self.next_index += 1;
                records.push(record);
            }
            None => {
                self.dropped += 1;
                debug!(source = %self.source, page, end, "Dropped short chunk candidate");
            }
        }
    }
}
