//! TEXT value escaping (RFC 5545 section 3.3.11) and UTC date-time formatting.

use chrono::{DateTime, Utc};

/// Escape a free-text property value.
///
/// Backslashes go first so the later substitutions are not escaped twice.
/// Carriage returns are folded into plain newlines.
pub fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Inverse of [`escape_text`]. Unknown escape sequences are kept verbatim.
pub fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(next @ ('\\' | ';' | ',')) => out.push(next),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// `YYYYMMDDTHHMMSSZ`, sub-second precision dropped.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_text("a;b,c"), "a\\;b\\,c");
        assert_eq!(escape_text("line one\nline two"), "line one\\nline two");
        assert_eq!(escape_text("C:\\temp"), "C:\\\\temp");
    }

    #[test]
    fn backslash_is_escaped_before_other_rules() {
        // a literal backslash followed by a comma must not collapse into "\,"
        assert_eq!(escape_text("\\,"), "\\\\\\,");
    }

    #[test]
    fn carriage_returns_become_newline_escapes() {
        assert_eq!(escape_text("a\r\nb\rc"), "a\\nb\\nc");
    }

    #[test]
    fn unescape_reverses_escape() {
        let samples = [
            "",
            "Plain title",
            "Week 3; Chapter 2, Part 1",
            "Path C:\\new\\notes",
            "literal \\n is not a newline",
            "multi\nline\ndescription, with; everything\\",
        ];
        for original in samples {
            assert_eq!(unescape_text(&escape_text(original)), original);
        }
    }

    #[test]
    fn unescape_keeps_unknown_sequences() {
        assert_eq!(unescape_text("a\\tb"), "a\\tb");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
        assert_eq!(unescape_text("upper\\Ncase"), "upper\ncase");
    }

    #[test]
    fn formats_utc_without_subseconds() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap()
            + chrono::Duration::milliseconds(987);
        assert_eq!(format_utc(&dt), "20250110T100000Z");
    }
}
