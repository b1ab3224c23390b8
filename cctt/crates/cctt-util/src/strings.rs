//! One-line rendering of source snippets for diagnostics.
//!
//! Error messages quote the offending bytes verbatim, which may contain
//! newlines, tabs, or arbitrary non-printable bytes. These helpers
//! rewrite everything onto a single line: printable ASCII passes
//! through, a space becomes a visible placeholder, the common control
//! characters become their named escapes, and anything else becomes
//! `\xNN`.

use std::fmt::Write;

/// Rendered in place of a literal space so snippets stay readable.
const VISIBLE_SPACE: &str = "\u{2423}";

/// Escape `text` onto a single line.
///
/// # Examples
///
/// ```
/// use cctt_util::format_to_oneline;
///
/// assert_eq!(format_to_oneline("a b"), "a\u{2423}b");
/// assert_eq!(format_to_oneline("a\tb\n"), "a\\tb\\n");
/// ```
pub fn format_to_oneline(text: &str) -> String {
    oneline(text.as_bytes())
}

/// Quote `text` like a string literal, escaping `"` and `\`, then
/// rewrite it onto a single line.
///
/// # Examples
///
/// ```
/// use cctt_util::quote;
///
/// assert_eq!(quote("abc"), "\"abc\"");
/// assert_eq!(quote("a\"b"), "\"a\\\"b\"");
/// ```
pub fn quote(text: &str) -> String {
    let mut escaped = Vec::with_capacity(text.len() + 2);
    escaped.push(b'"');
    for &b in text.as_bytes() {
        if b == b'"' || b == b'\\' {
            escaped.push(b'\\');
        }
        escaped.push(b);
    }
    escaped.push(b'"');
    oneline(&escaped)
}

fn oneline(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            0x21..=0x7e => out.push(b as char),
            b' ' => out.push_str(VISIBLE_SPACE),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x0c => out.push_str("\\f"),
            0x0b => out.push_str("\\v"),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii_passes_through() {
        assert_eq!(format_to_oneline("abc!~"), "abc!~");
    }

    #[test]
    fn test_space_becomes_placeholder() {
        assert_eq!(format_to_oneline("a b"), "a\u{2423}b");
    }

    #[test]
    fn test_named_escapes() {
        assert_eq!(
            format_to_oneline("\t\n\r\x0c\x0b"),
            "\\t\\n\\r\\f\\v"
        );
    }

    #[test]
    fn test_hex_escape_for_other_bytes() {
        assert_eq!(format_to_oneline("\x01"), "\\x01");
        assert_eq!(format_to_oneline("\u{00e9}"), "\\xc3\\xa9");
    }

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote("abc"), "\"abc\"");
    }

    #[test]
    fn test_quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_quote_multiline_snippet() {
        assert_eq!(quote("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn test_quote_empty() {
        assert_eq!(quote(""), "\"\"");
    }
}
