//! Host timestamp parsing.
//!
//! Hosts send ISO 8601 timestamps. Most carry a UTC offset, but
//! local-time stamps (`2024-03-01T10:15:30.123`) are common too and are
//! read in the renderer's local time zone.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses an ISO 8601 timestamp with or without a UTC offset.
///
/// # Errors
///
/// Returns the chrono parse error for text that is neither RFC 3339 nor a
/// local `YYYY-MM-DDTHH:MM:SS[.fff]` stamp.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time);
    }
    let naive = NaiveDateTime::parse_from_str(text, LOCAL_FORMAT)?;
    // Wall-clock times inside a DST gap have no local mapping; treat them as UTC.
    Ok(naive
        .and_local_timezone(Local)
        .earliest()
        .map_or_else(|| naive.and_utc().fixed_offset(), |dt| dt.fixed_offset()))
}

pub(crate) fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_timestamp(text)
            .map(Some)
            .map_err(|err| D::Error::custom(format!("invalid timestamp {text:?}: {err}"))),
    }
}
