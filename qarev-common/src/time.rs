//! Timestamp utilities
//!
//! The review server emits `submitted_at` either as RFC 3339 or as a naive
//! ISO-8601 string without an offset (Python `datetime.isoformat()` on a UTC
//! value). Naive values are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a server timestamp, accepting RFC 3339 or naive ISO-8601 (as UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde helper for optional server timestamps
///
/// `null`, a missing field, and unparseable strings all become `None`, which
/// sorts as the oldest possible value.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
