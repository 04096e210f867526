//! Literal-style text rendering used by article representations.
//!
//! # Invariants
//! - Quoting picks single quotes unless the text contains `'` and no `"`.
//! - Timestamps render as `YYYY-MM-DDTHH:MM:SS`, plus `.ffffff` when the
//!   sub-second part is non-zero.

use chrono::{NaiveDateTime, Timelike};
use std::fmt::Write;

/// Quotes `value` as a string literal, escaping as needed.
pub fn quote_literal(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = u32::from(c);
                // Writing to a String cannot fail.
                let _ = if code <= 0xff {
                    write!(out, "\\x{code:02x}")
                } else if code <= 0xffff {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Whether `ch` is shown as-is inside a quoted literal.
///
/// Controls, separators other than the plain space, format characters and
/// private-use characters are escaped.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    if ch.is_control() || ch.is_whitespace() {
        return false;
    }
    !matches!(
        u32::from(ch),
        0x00ad
            | 0x0600..=0x0605
            | 0x061c
            | 0x06dd
            | 0x070f
            | 0x0890..=0x0891
            | 0x08e2
            | 0x180e
            | 0x200b..=0x200f
            | 0x202a..=0x202e
            | 0x2060..=0x2064
            | 0x2066..=0x206f
            | 0xe000..=0xf8ff
            | 0xfeff
            | 0xfff9..=0xfffb
            | 0x110bd
            | 0x110cd
            | 0x13430..=0x1343f
            | 0x1bca0..=0x1bca3
            | 0x1d173..=0x1d17a
            | 0xe0001
            | 0xe0020..=0xe007f
            | 0xf0000..=0xffffd
            | 0x100000..=0x10fffd
    )
}

/// Formats `value` as an ISO-8601 date-time without offset.
pub fn iso_datetime(value: &NaiveDateTime) -> String {
    // A leap second is stored as nanoseconds past 1_000_000_000.
    let micros = (value.nanosecond() / 1_000) % 1_000_000;
    if micros == 0 {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{micros:06}", value.format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// Strips the module path and generic arguments from a type name.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::{iso_datetime, quote_literal, short_type_name};
    use chrono::NaiveDate;

    #[test]
    fn quote_literal_defaults_to_single_quotes() {
        assert_eq!(quote_literal("Hans Christian Andersen"), "'Hans Christian Andersen'");
    }

    #[test]
    fn quote_literal_switches_to_double_quotes_for_apostrophes() {
        assert_eq!(
            quote_literal("The emperor's new clothes"),
            "\"The emperor's new clothes\""
        );
    }

    #[test]
    fn quote_literal_escapes_when_both_quotes_present() {
        assert_eq!(quote_literal(r#"it's "fine""#), r#"'it\'s "fine"'"#);
    }

    #[test]
    fn quote_literal_escapes_control_characters() {
        assert_eq!(quote_literal("a\nb\\c\u{1}"), "'a\\nb\\\\c\\x01'");
    }

    #[test]
    fn quote_literal_escapes_invisible_characters() {
        assert_eq!(quote_literal("a\u{a0}b"), "'a\\xa0b'");
        assert_eq!(quote_literal("zero\u{200b}width"), "'zero\\u200bwidth'");
        assert_eq!(quote_literal("line\u{2028}sep"), "'line\\u2028sep'");
        assert_eq!(quote_literal("private\u{f0000}"), "'private\\U000f0000'");
        assert_eq!(quote_literal("café ünï"), "'café ünï'");
    }

    #[test]
    fn iso_datetime_drops_leap_second_overflow() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 1_500_000)
            .unwrap();
        assert_eq!(iso_datetime(&leap), "2016-12-31T23:59:59.500000");
    }

    #[test]
    fn iso_datetime_includes_micros_only_when_present() {
        let whole = NaiveDate::from_ymd_opt(1837, 4, 7)
            .unwrap()
            .and_hms_opt(12, 15, 0)
            .unwrap();
        assert_eq!(iso_datetime(&whole), "1837-04-07T12:15:00");

        let fractional = NaiveDate::from_ymd_opt(2020, 7, 2)
            .unwrap()
            .and_hms_micro_opt(15, 3, 10, 250)
            .unwrap();
        assert_eq!(iso_datetime(&fractional), "2020-07-02T15:03:10.000250");
    }

    #[test]
    fn short_type_name_drops_paths_and_generics() {
        assert_eq!(short_type_name("articlekit_core::model::article::Article"), "Article");
        assert_eq!(short_type_name("demo::Wrapper<alloc::string::String>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
