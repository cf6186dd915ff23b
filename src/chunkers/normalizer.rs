//! Text normalization and page sentinel extraction.
//!
//! Raw page text arrives with an in-band `[PAGE_END:<n>]` marker. The
//! normalizer reports the page number, removes the marker and cleans the
//! text so the chunker only ever sees collapsed, printable content.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PAGE_SENTINEL: Regex = Regex::new(r"\[PAGE_END:(\d+)\]").unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();
    static ref BLANKS: Regex = Regex::new(r"[ \t]+").unwrap();
}

/// Format the sentinel that marks the end of `page`.
pub fn page_sentinel(page: u32) -> String {
    format!("[PAGE_END:{}]", page)
}

/// Result of normalizing one raw segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Cleaned text
    pub text: String,
    /// Page number reported by a sentinel, if one was present
    pub page: Option<u32>,
}

/// Check if `c` is on the control-character denylist.
///
/// Tab, line feed and carriage return are kept; they are handled by the
/// whitespace collapsing steps instead.
pub fn is_denied_control(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{0008}'
        | '\u{000B}'
        | '\u{000C}'
        | '\u{000E}'..='\u{001F}'
        | '\u{007F}'..='\u{009F}')
}

/// Normalize a raw text segment.
///
/// Control characters are removed first so that deleting them can never
/// leave behind a fresh whitespace run or sentinel; this keeps the
/// function idempotent.
pub fn normalize(raw: &str) -> Normalized {
    let mut text: String = raw.chars().filter(|c| !is_denied_control(*c)).collect();

    let mut page = None;
    while PAGE_SENTINEL.is_match(&text) {
        for caps in PAGE_SENTINEL.captures_iter(&text) {
            if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                page = Some(n);
            }
        }
        text = PAGE_SENTINEL.replace_all(&text, "").into_owned();
    }

    let text = LINE_BREAKS.replace_all(&text, "\n");
    let text = BLANKS.replace_all(&text, " ").into_owned();

    Normalized { text, page }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_sentinel() {
        let result = normalize("End of the first page.[PAGE_END:1]");
        assert_eq!(result.text, "End of the first page.");
        assert_eq!(result.page, Some(1));
    }

    #[test]
    fn test_no_sentinel() {
        let result = normalize("plain text");
        assert_eq!(result.page, None);
        assert_eq!(result.text, "plain text");
    }

    #[test]
    fn test_collapses_whitespace() {
        let result = normalize("a  \t b\r\n\r\n\nc\t\td");
        assert_eq!(result.text, "a b\nc d");
    }

    #[test]
    fn test_removes_control_characters() {
        let result = normalize("he\u{0000}llo\u{0007} wor\u{007F}ld\u{0085}\u{000C}");
        assert_eq!(result.text, "hello world");
    }

    #[test]
    fn test_keeps_latin1_and_unicode() {
        let result = normalize("café über ñ — 日本");
        assert_eq!(result.text, "café über ñ — 日本");
    }

    #[test]
    fn test_control_removal_does_not_leave_runs() {
        let result = normalize("a \u{000C} b");
        assert_eq!(result.text, "a b");
    }

    #[test]
    fn test_overflowing_page_number_is_stripped_without_update() {
        let result = normalize("text[PAGE_END:99999999999]");
        assert_eq!(result.text, "text");
        assert_eq!(result.page, None);
    }

    #[test]
    fn test_literal_sentinel_in_content_is_stripped() {
        let result = normalize("see marker [PAGE_END:7] here[PAGE_END:3]");
        assert_eq!(result.text, "see marker here");
        assert_eq!(result.page, Some(3));
    }

    #[test]
    fn test_nested_sentinel_is_fully_removed() {
        let result = normalize("x[PAGE_[PAGE_END:1]END:2]y");
        assert_eq!(result.text, "xy");
        assert_eq!(result.page, Some(2));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Intro.\r\n\r\n  Body\t\ttext\u{0001} with   gaps.[PAGE_END:4]",
            "a \u{000B} \n \u{0000}\n b",
            "x[PAGE_[PAGE_END:1]END:2]y  \t\r",
            "",
        ];

        for input in inputs {
            let once = normalize(input).text;
            let twice = normalize(&once).text;
            assert_eq!(once, twice, "input: {:?}", input);
        }
    }

    #[test]
    fn test_page_sentinel_format() {
        assert_eq!(page_sentinel(12), "[PAGE_END:12]");
        assert_eq!(normalize(&format!("abc{}", page_sentinel(12))).page, Some(12));
    }
}
