//! Date normalization
//!
//! Contract dates come in exactly two shapes, `DD.MM.YYYY` and `YYYY-MM-DD`.
//! Anything else is treated as unparseable rather than guessed at.
//!
//! The reference timestamp is a full ISO-8601 style timestamp. Any UTC offset
//! is dropped and the wall-clock reading kept, because contract dates are
//! naive calendar dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{FeatureError, Result};

/// Accepted contract date formats, in priority order
pub const CONTRACT_DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

const OFFSET_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a contract or claim date.
///
/// Returns `None` for empty input or anything that is not one of
/// [`CONTRACT_DATE_FORMATS`]. Both formats start with a digit; chrono alone
/// would also accept a leading sign or whitespace.
pub fn parse_contract_date(text: &str) -> Option<NaiveDate> {
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    CONTRACT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Parse the reference (application) timestamp into naive local time.
pub fn parse_reference_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FeatureError::MissingReferenceTimestamp);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local());
    }

    for fmt in OFFSET_TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Ok(dt.naive_local());
        }
    }

    for fmt in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| FeatureError::invalid_reference(text))
}

/// Whole days from `date` (at midnight) to `reference`, rounded down.
///
/// The time of day on `reference` is always in `[0, 24h)`, so flooring the
/// full difference is the same as subtracting calendar dates.
pub fn days_between(reference: NaiveDateTime, date: NaiveDate) -> i64 {
    (reference.date() - date).num_days()
}
