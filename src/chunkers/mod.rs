//! Normalization, page tracking and streaming chunking.

mod base;
mod normalizer;
mod page_tracker;
mod stream_chunker;

pub use base::{
    estimate_tokens, is_sentence_terminator, CharRatioEstimator, TokenEstimator,
    SENTENCE_TERMINATORS,
};
pub use normalizer::{is_denied_control, normalize, page_sentinel, Normalized};
pub use page_tracker::PageTracker;
pub use stream_chunker::StreamChunker;
