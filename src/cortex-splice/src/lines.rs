//! Line model: splitting text into terminated lines and fixing up the
//! replacement block.

use std::borrow::Cow;

const UTF8_BOM: &str = "\u{feff}";

/// Line terminator style of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// A lone `\r`
    Cr,
}

impl LineEnding {
    /// Detect the terminator style from the first terminated line.
    ///
    /// Text without any terminator is treated as [`LineEnding::Lf`].
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        match bytes.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(idx) if bytes[idx] == b'\n' => LineEnding::Lf,
            Some(idx) if bytes.get(idx + 1) == Some(&b'\n') => LineEnding::CrLf,
            Some(_) => LineEnding::Cr,
            None => LineEnding::Lf,
        }
    }

    /// The terminator itself.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// Split text into lines, each keeping its terminator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. The last element has no
/// terminator when the text does not end with one. Empty text has zero lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for (idx, &b) in bytes.iter().enumerate() {
        let ends_line = match b {
            b'\n' => true,
            b'\r' => bytes.get(idx + 1) != Some(&b'\n'),
            _ => false,
        };
        if ends_line {
            lines.push(&text[start..=idx]);
            start = idx + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Whether `text` ends with any line terminator.
pub fn ends_with_terminator(text: &str) -> bool {
    text.ends_with('\n') || text.ends_with('\r')
}

/// Append `ending` unless `text` already ends with a line terminator.
///
/// Empty text becomes a single empty line.
pub fn ensure_trailing_newline(text: &str, ending: LineEnding) -> Cow<'_, str> {
    if ends_with_terminator(text) {
        Cow::Borrowed(text)
    } else {
        let mut owned = String::with_capacity(text.len() + 2);
        owned.push_str(text);
        owned.push_str(ending.as_str());
        Cow::Owned(owned)
    }
}

/// Drop a leading UTF-8 byte-order mark.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(UTF8_BOM).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_terminators() {
        assert_eq!(split_lines("a\nb\r\nc"), vec!["a\n", "b\r\n", "c"]);
        assert_eq!(split_lines("a\n\n"), vec!["a\n", "\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_on_lone_carriage_return() {
        assert_eq!(split_lines("a\rb\rc\r"), vec!["a\r", "b\r", "c\r"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a\r\n", "b\r", "c"]);
        assert_eq!(split_lines("\r\r\n\n"), vec!["\r", "\r\n", "\n"]);
    }

    #[test]
    fn test_split_then_concat_is_identity() {
        let text = "first\r\nsecond\n\rthird\r\nlast without eol";
        assert_eq!(split_lines(text).concat(), text);
    }

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("no newline"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\rb\n"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("\r\n"), LineEnding::CrLf);
    }

    #[test]
    fn test_ensure_trailing_newline() {
        assert!(matches!(
            ensure_trailing_newline("x\n", LineEnding::Lf),
            Cow::Borrowed("x\n")
        ));
        assert_eq!(ensure_trailing_newline("noeol", LineEnding::Lf), "noeol\n");
        assert_eq!(ensure_trailing_newline("noeol", LineEnding::CrLf), "noeol\r\n");
        assert_eq!(ensure_trailing_newline("", LineEnding::Lf), "\n");
        assert_eq!(ensure_trailing_newline("x\r\n", LineEnding::Lf), "x\r\n");
        assert_eq!(ensure_trailing_newline("x\r", LineEnding::Lf), "x\r");
        assert_eq!(ensure_trailing_newline("noeol", LineEnding::Cr), "noeol\r");
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}hello"), "hello");
        assert_eq!(strip_bom("hello"), "hello");
        assert_eq!(strip_bom("he\u{feff}llo"), "he\u{feff}llo");
    }
}
