//! Text normalization for detected text.
//!
//! Detection services return text with inconsistent line endings, stray
//! whitespace and mixed Unicode composition. Line breaks carry layout meaning
//! (they drive the line count used for font sizing), so they are kept.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of horizontal whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{2000}-\u{200B}\u{3000}]+").unwrap());

/// Literal `\n` escapes some models emit instead of real line breaks.
static ESCAPED_NEWLINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\r\\n|\\n").unwrap());

/// Map characters XML 1.0 cannot carry: vertical tab and form feed become
/// line breaks, other C0 controls (except tab and line feed) and the
/// noncharacters U+FFFE/U+FFFF are dropped.
pub fn sanitize_xml_text(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{000B}' | '\u{000C}' => Some('\n'),
            '\t' | '\n' => Some(c),
            '\u{0000}'..='\u{001F}' | '\u{FFFE}' | '\u{FFFF}' => None,
            _ => Some(c),
        })
        .collect()
}

/// Text normalizer for detected text elements.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new text normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize the text of one element.
    ///
    /// - Applies Unicode NFC composition
    /// - Turns literal `\n` escapes into line breaks
    /// - Converts `\r\n` and `\r` to `\n`
    /// - Maps vertical tab and form feed to `\n`, drops other control characters
    /// - Collapses whitespace runs to single spaces and trims each line
    /// - Drops blank lines at the start and end
    pub fn normalize(&self, text: &str) -> String {
        let result: String = text.nfc().collect();
        let result = ESCAPED_NEWLINE_REGEX.replace_all(&result, "\n");
        let result = sanitize_xml_text(&result.replace("\r\n", "\n").replace('\r', "\n"));

        let lines: Vec<String> = result
            .split('\n')
            .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
            .collect();

        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize("Hello    world"), "Hello world");
        assert_eq!(normalizer.normalize("  Hello  "), "Hello");
        assert_eq!(normalizer.normalize("\t\tHello\t\t"), "Hello");
        assert_eq!(normalizer.normalize("Hello\u{00A0}\u{00A0}world"), "Hello world");
    }

    #[test]
    fn test_line_endings() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize("Line one\r\nLine two"), "Line one\nLine two");
        assert_eq!(normalizer.normalize("Line one\rLine two"), "Line one\nLine two");
    }

    #[test]
    fn test_escaped_newlines() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(r"Hello\nWorld"), "Hello\nWorld");
        assert_eq!(normalizer.normalize(r"Hello\r\nWorld"), "Hello\nWorld");
    }

    #[test]
    fn test_trims_blank_edges_keeps_inner_blank_lines() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("\n\n  Title \n\n Body\n  \n"), "Title\n\nBody");
    }

    #[test]
    fn test_blank_input() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize(" \n\t\n "), "");
    }

    #[test]
    fn test_control_characters() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("A\u{000B}B\u{0001}"), "A\nB");
        assert_eq!(normalizer.normalize("Page\u{000C}Two\u{0000}"), "Page\nTwo");
        assert_eq!(normalizer.normalize("\u{0007}\u{001B}"), "");
    }

    #[test]
    fn test_sanitize_xml_text() {
        assert_eq!(sanitize_xml_text("A\u{000B}B\u{0001}"), "A\nB");
        assert_eq!(sanitize_xml_text("tab\tkept\nline\u{FFFF}"), "tab\tkept\nline");
        assert_eq!(sanitize_xml_text("caf\u{00E9} \u{0085}"), "caf\u{00E9} \u{0085}");
    }

    #[test]
    fn test_nfc_composition() {
        let normalizer = TextNormalizer::new();
        // "e" followed by a combining acute accent
        assert_eq!(normalizer.normalize("Cafe\u{0301}"), "Caf\u{00E9}");
    }
}
