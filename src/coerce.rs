//! Primitive type coercers
//!
//! Each coercer accepts a value that already has the target type unchanged
//! and falls back to parsing strings:
//! - `string`: strings only
//! - `number`: numbers, or numeric strings with `,` accepted as decimal mark
//! - `boolean`: booleans, or exactly `"true"` / `"false"`
//! - `date`: timestamps, epoch milliseconds, or date strings
//!
//! Objects are coerced by the engine since they recurse into a nested schema.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use crate::error::{CoerceError, Result};
use crate::value::Value;

/// Largest absolute epoch offset accepted for dates, in milliseconds
/// (100,000,000 days either side of 1970-01-01).
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

pub fn coerce_string(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(CoerceError::type_mismatch(path, "String", other.type_name())),
    }
}

pub fn coerce_number(value: &Value, path: &str) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => parse_number(s),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).ok_or_else(|| {
        CoerceError::type_mismatch_because(
            path,
            "Number",
            value.type_name(),
            "which is not considered as a Number",
        )
    })
}

pub fn coerce_boolean(value: &Value, path: &str) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(CoerceError::type_mismatch_because(
            path,
            "Boolean",
            other.type_name(),
            "which is not considered as a Boolean",
        )),
    }
}

pub fn coerce_date(value: &Value, path: &str) -> Result<DateTime<Utc>> {
    let parsed = match value {
        Value::Date(d) => Some(*d),
        Value::Number(n) => from_epoch_millis(*n),
        Value::String(s) => parse_date_str(s)
            .or_else(|| parse_number(s).and_then(from_epoch_millis)),
        Value::Bool(_) | Value::Null | Value::List(_) | Value::Map(_) => None,
    };

    parsed.ok_or_else(|| {
        CoerceError::type_mismatch_because(
            path,
            "Date",
            value.type_name(),
            "which cannot be cast to a valid Date",
        )
    })
}

/// Parses a numeric string, accepting `,` as decimal separator.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    Utc.timestamp_millis_opt(millis.trunc() as i64).single()
}

/// Trailing zone name in JavaScript `Date.toString()` output, e.g.
/// ` (Coordinated Universal Time)`.
fn zone_name_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("valid regex"))
}

/// Reduced-precision ISO-8601 calendar dates: `YYYY`, `YYYY-MM` and the
/// basic `YYYYMMDD` form.
fn reduced_calendar_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<year>\d{4})(?:-(?P<month>\d{2})|(?P<bmonth>\d{2})(?P<bday>\d{2}))?$")
            .expect("valid regex")
    })
}

const OFFSET_FORMATS: &[&str] = &[
    "%a %b %d %Y %H:%M:%S GMT%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%a %b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%a %b %d %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
    "%m/%d/%Y",
];

/// Parses ISO-8601, RFC 2822 and common human-readable date strings.
/// Strings without an offset are read as UTC.
fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(d) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(d.with_timezone(&Utc));
    }

    if let Some(d) = parse_reduced_calendar_date(trimmed) {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let cleaned = zone_name_suffix().replace(trimmed, "");
    // A trailing `Z` means UTC, which is how offset-less strings are read.
    let s: &str = cleaned
        .strip_suffix('Z')
        .or_else(|| cleaned.strip_suffix('z'))
        .unwrap_or(&*cleaned);

    for fmt in OFFSET_FORMATS {
        if let Ok(d) = DateTime::<FixedOffset>::parse_from_str(s, fmt) {
            return Some(d.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

fn parse_reduced_calendar_date(s: &str) -> Option<NaiveDate> {
    let caps = reduced_calendar_date().captures(s)?;
    let year: i32 = caps["year"].parse().ok()?;
    let month: u32 = match caps.name("month").or_else(|| caps.name("bmonth")) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    let day: u32 = match caps.name("bday") {
        Some(d) => d.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
