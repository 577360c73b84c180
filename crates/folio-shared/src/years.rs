//! Elapsed-years arithmetic
//!
//! Durations are converted with an average year of 365.25 days and reported to
//! one decimal place. A start date after the reference date clamps to zero.

use crate::error::{FolioError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Average year length in milliseconds (365.25 days)
pub const MILLIS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Round half-up at the tenths digit
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Years between `start` and `reference`, rounded to one decimal place.
///
/// Returns 0.0 when `start` is after `reference`.
pub fn compute(start: DateTime<Utc>, reference: DateTime<Utc>) -> f64 {
    if start > reference {
        return 0.0;
    }

    let elapsed_ms = (reference - start).num_milliseconds() as f64;
    round_tenths(elapsed_ms / MILLIS_PER_YEAR)
}

/// Midnight UTC on January 1st of `year`
pub fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

/// Parse a start date given as RFC 3339 or plain `YYYY-MM-DD` (midnight UTC)
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| FolioError::InvalidDate(input.to_string()))
}
