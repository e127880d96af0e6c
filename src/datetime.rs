//! Date/time utilities for gator.
//!
//! Timestamps are stored in the database as fixed-width UTC text, so that
//! `ORDER BY` on the column is chronological.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage format for timestamps (microsecond precision, fixed width).
const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// RFC 1123 with a numeric zone, without the leading day name.
///
/// The day name is checked separately, since `%a` also requires it to match
/// the date.
const RFC1123Z_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S %z";

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Format a UTC datetime for storage.
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Parse a stored datetime string.
///
/// Accepts the storage format (with or without fractional seconds) and RFC3339.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    None
}

/// Parse an RSS `pubDate` in RFC1123Z form, e.g.
/// `Mon, 02 Jan 2006 15:04:05 -0700`.
///
/// The day name must be a valid abbreviation but need not match the date.
pub fn parse_rfc1123z(s: &str) -> Option<DateTime<Utc>> {
    let (day, rest) = s.trim().split_once(", ")?;
    if !DAY_NAMES.iter().any(|name| name.eq_ignore_ascii_case(day)) {
        return None;
    }

    DateTime::parse_from_str(rest, RFC1123Z_DATE_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an RSS `pubDate`, falling back to the current time.
pub fn parse_pub_date_or_now(s: &str) -> DateTime<Utc> {
    parse_rfc1123z(s).unwrap_or_else(Utc::now)
}

/// Format a datetime for terminal output.
pub fn format_display(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_round_trip_keeps_microseconds() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        let stored = to_storage(&dt);
        assert_eq!(stored, "2024-01-15 10:30:00.123456");
        assert_eq!(parse_datetime(&stored), Some(dt));
    }

    #[test]
    fn test_storage_format_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let late = early + chrono::Duration::microseconds(5);
        assert!(to_storage(&early) < to_storage(&late));
    }

    #[test]
    fn test_parse_datetime_without_fraction() {
        let dt = parse_datetime("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_parse_rfc1123z() {
        let dt = parse_rfc1123z("Mon, 02 Jan 2006 15:04:05 -0700").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_rfc1123z_ignores_wrong_weekday() {
        // 2 January 2024 was a Tuesday.
        let dt = parse_rfc1123z("Mon, 02 Jan 2024 10:00:00 +0000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap());
        assert_eq!(parse_rfc1123z("Tue, 02 Jan 2024 10:00:00 +0000"), Some(dt));
    }

    #[test]
    fn test_parse_rfc1123z_rejects_bad_day_name() {
        assert!(parse_rfc1123z("Xyz, 02 Jan 2024 10:00:00 +0000").is_none());
        assert!(parse_rfc1123z("02 Jan 2024 10:00:00 +0000").is_none());
    }

    #[test]
    fn test_parse_rfc1123z_rejects_named_zone() {
        assert!(parse_rfc1123z("Mon, 02 Jan 2006 15:04:05 MST").is_none());
        assert!(parse_rfc1123z("2006-01-02").is_none());
        assert!(parse_rfc1123z("").is_none());
    }

    #[test]
    fn test_parse_pub_date_or_now_falls_back() {
        let before = Utc::now();
        let dt = parse_pub_date_or_now("not a date");
        let after = Utc::now();
        assert!(dt >= before && dt <= after);
    }
}
