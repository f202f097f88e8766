//! Date parsing and comparison

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO8601_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[-+]?\d{4}(?:-?(?:1[0-2]|0[1-9])(?:-?(?:3[01]|0[1-9]|[12]\d))?|-?W(?:5[0-3]|[1-4]\d|0[1-9])(?:-?[1-7])?|-?(?:36[0-6]|3[0-5]\d|[12]\d{2}|0[1-9]\d|00[1-9]))?(?:[T\s](?:(?:[01]\d|2[0-3])(?::?[0-5]\d(?::?[0-5]\d(?:[.,]\d+)?)?)?|24(?::?00(?::?00)?)?)(?:Z|[-+](?:[01]\d|2[0-3])(?::?[0-5]\d)?)?)?$",
    )
    .unwrap()
});

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// Parse the common textual date shapes into a UTC instant.
///
/// Values without an offset are read as UTC; date-only values land at midnight.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&midnight));
        }
    }

    None
}

pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// ISO 8601 calendar, week or ordinal date with optional time and offset
pub fn is_iso8601(value: &str) -> bool {
    ISO8601_REGEX.is_match(value)
}

fn reference_date(reference: Option<&str>) -> Option<DateTime<Utc>> {
    match reference {
        Some(reference) => parse_date(reference),
        None => Some(Utc::now()),
    }
}

/// Strictly later than `reference`, or than now when `reference` is `None`
pub fn is_after(value: &str, reference: Option<&str>) -> bool {
    match (parse_date(value), reference_date(reference)) {
        (Some(date), Some(reference)) => date > reference,
        _ => false,
    }
}

/// Strictly earlier than `reference`, or than now when `reference` is `None`
pub fn is_before(value: &str, reference: Option<&str>) -> bool {
    match (parse_date(value), reference_date(reference)) {
        (Some(date), Some(reference)) => date < reference,
        _ => false,
    }
}

/// Normalize a date string to RFC 3339 UTC with millisecond precision
pub fn to_date(value: &str) -> Option<String> {
    parse_date(value).map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
