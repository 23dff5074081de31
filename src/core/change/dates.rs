//! Date comparison under the Asia/Tokyo calendar
//!
//! Incoming dates are calendar days; stored dates are instants. A calendar day
//! is stored as the instant of 00:00 Asia/Tokyo on that day. Asia/Tokyo has no
//! daylight saving, so a fixed UTC+09:00 offset is exact.

use crate::domain::{CuratorError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

const TOKYO_OFFSET_SECONDS: i32 = 9 * 3600;

/// Calendar date format accepted from the extraction service
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The Asia/Tokyo offset
pub fn tokyo_offset() -> FixedOffset {
    match FixedOffset::east_opt(TOKYO_OFFSET_SECONDS) {
        Some(offset) => offset,
        None => unreachable!("UTC+09:00 is within the accepted offset range"),
    }
}

/// Parses an incoming calendar date into its stored instant
///
/// `None` and blank strings mean "unknown" and yield `Ok(None)`.
///
/// # Errors
///
/// Returns `CuratorError::Validation` if the string is not a `yyyy-mm-dd` date.
///
/// # Examples
///
/// ```
/// use curator::core::change::parse_incoming_date;
///
/// let instant = parse_incoming_date(Some("2024-04-01")).unwrap().unwrap();
/// assert_eq!(instant.to_rfc3339(), "2024-03-31T15:00:00+00:00");
/// assert_eq!(parse_incoming_date(Some("")).unwrap(), None);
/// ```
pub fn parse_incoming_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| CuratorError::Validation(format!("invalid date '{raw}': {e}")))?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        CuratorError::Validation(format!("invalid date '{raw}': no midnight"))
    })?;

    tokyo_offset()
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .ok_or_else(|| CuratorError::Validation(format!("invalid date '{raw}'")))
}

/// Compares a stored date with an incoming calendar date
///
/// Both absent is equal, exactly one absent is not equal, and two present
/// values are equal when the incoming day's Tokyo midnight is the stored
/// instant. An incoming string that does not parse is never equal.
pub fn dates_equal(stored: Option<&DateTime<Utc>>, incoming: Option<&str>) -> bool {
    match parse_incoming_date(incoming) {
        Ok(parsed) => instants_equal(stored, parsed.as_ref()),
        Err(_) => false,
    }
}

/// Compares two optional instants, treating absent as a value of its own
pub fn instants_equal(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
