use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::domain::DomainError;

/// Parse a stored creation timestamp.
///
/// Accepts RFC 3339 (what Supabase and `to_rfc3339` produce) and the
/// `YYYY-MM-DD HH:MM:SS` form SQLite's `datetime('now')` writes, read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| DomainError::Internal(format!("Invalid timestamp '{}'", value)))
}

/// Format used for every timestamp this crate writes
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
