//! Shared helpers for chunkers and formatters.

/// Token estimator trait for approximating token counts.
///
/// Formatters only need a count, so a precise tokenizer can be dropped in
/// behind this trait without touching chunking or packing.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the number of tokens in the given text.
    fn estimate(&self, text: &str) -> usize;
}

/// Estimator that divides the character count by a fixed ratio.
#[derive(Debug, Clone, Copy)]
pub struct CharRatioEstimator {
    chars_per_token: f64,
}

impl CharRatioEstimator {
    /// Create an estimator with the given characters-per-token ratio.
    pub fn new(chars_per_token: f64) -> Self {
        Self { chars_per_token }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        if self.chars_per_token <= 0.0 {
            return 0;
        }
        (text.chars().count() as f64 / self.chars_per_token).round() as usize
    }
}

/// Helper function to estimate tokens with the default ratio.
pub fn estimate_tokens(text: &str) -> usize {
    CharRatioEstimator::default().estimate(text)
}

/// Characters that end a sentence when followed by whitespace.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Check if `c` ends a sentence.
pub fn is_sentence_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdef"), 2);
        assert_eq!(estimate_tokens("abcde"), 1);
        assert_eq!(estimate_tokens(&"x".repeat(1500)), 375);
    }

    #[test]
    fn test_estimate_counts_characters_not_bytes() {
        assert_eq!(estimate_tokens("żółć"), 1);
    }

    #[test]
    fn test_custom_ratio() {
        let estimator = CharRatioEstimator::new(2.0);
        assert_eq!(estimator.estimate("abcdef"), 3);
    }
}
