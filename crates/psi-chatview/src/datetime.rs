//! Date/time formatting for template variables.
//!
//! Themes specify formats in one of two notations. Patterns containing `%`
//! are strftime patterns and are used as is. Anything else is read as a
//! moment.js / Unicode TR35 style pattern (`HH:mm`, `EEEE LL`, ...) and
//! translated to strftime. Text inside `[...]` is copied literally.
//!
//! A pattern chrono cannot format falls back to [`FALLBACK_PATTERN`].

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use tracing::warn;

/// Pattern used when a theme supplies an unusable one.
pub const FALLBACK_PATTERN: &str = "%H:%M:%S";

// Longest tokens first.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("yyyy", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("EEEE", "%A"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("EEE", "%a"),
    ("YY", "%y"),
    ("yy", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("LL", "%B %-d, %Y"),
    ("LT", "%-I:%M %p"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("d", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("j", "%-H"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
];

/// A validated date/time pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormatter {
    strftime: String,
}

impl DateTimeFormatter {
    /// Build a formatter from a theme pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            translate(pattern)
        };
        if is_valid(&strftime) {
            Self { strftime }
        } else {
            warn!(pattern, "unusable date format, falling back");
            Self {
                strftime: FALLBACK_PATTERN.to_string(),
            }
        }
    }

    /// Equivalent strftime pattern.
    #[must_use]
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    #[must_use]
    pub fn format(&self, time: &DateTime<FixedOffset>) -> String {
        time.format(&self.strftime).to_string()
    }
}

impl Default for DateTimeFormatter {
    fn default() -> Self {
        Self {
            strftime: FALLBACK_PATTERN.to_string(),
        }
    }
}

fn is_valid(strftime: &str) -> bool {
    !StrftimeItems::new(strftime).any(|item| matches!(item, Item::Error))
}

fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end].replace('%', "%%"));
                rest = &rest[end + 1..];
                continue;
            }
        }
        for (token, strftime) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(strftime);
                rest = tail;
                continue 'outer;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}
