//! Timestamp normalization.
//!
//! Log producers encode time either as fractional seconds since the Unix
//! epoch (`"ts":1545445711.144533`) or as an RFC 3339 string
//! (`"time":"2018-12-21T23:06:49.435919-05:00"`). Both are brought down to a
//! UTC instant with millisecond precision and then displayed in the
//! configured zone as `YYYY-MM-DD HH:MM:SS.mmm ZZZ`.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::record::ExtractError;

/// Display format; `%Z` renders the zone abbreviation (`EST`, `EDT`, ...).
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %Z";

const NANOS_PER_SEC: f64 = 1_000_000_000.0;
const NANOS_PER_MILLI: u32 = 1_000_000;

/// Parses a JSON timestamp value into a millisecond-precision instant.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidTimestamp`] for unparseable strings,
/// non-finite or out-of-range numbers, and [`ExtractError::WrongKind`] for
/// any other JSON kind.
pub fn parse_value(field: &'static str, value: &Value) -> Result<DateTime<Utc>, ExtractError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(from_epoch_seconds)
            .ok_or_else(|| ExtractError::InvalidTimestamp(n.to_string())),
        Value::String(s) => {
            parse_iso8601(s).ok_or_else(|| ExtractError::InvalidTimestamp(s.clone()))
        }
        _ => Err(ExtractError::WrongKind {
            field,
            expected: "number or string",
        }),
    }
}

/// Converts fractional epoch seconds to an instant, truncated to milliseconds.
///
/// The fraction is rounded to whole nanoseconds first so that values such as
/// `1.001` are not shaved to `.000` by binary float error.
#[must_use]
pub fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut nanos = ((seconds - whole) * NANOS_PER_SEC).round() as u32;
    #[allow(clippy::cast_possible_truncation)]
    let mut secs = whole as i64;
    if nanos >= 1_000_000_000 {
        secs = secs.checked_add(1)?;
        nanos -= 1_000_000_000;
    }
    DateTime::from_timestamp(secs, nanos).map(truncate_to_millis)
}

/// Parses an ISO-8601 timestamp carrying an explicit offset or `Z`.
///
/// RFC 3339 is tried first; offsets written without a colon (`+0000`) are
/// accepted as a fallback.
#[must_use]
pub fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|dt| truncate_to_millis(dt.with_timezone(&Utc)))
}

/// Drops everything below the millisecond.
#[must_use]
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = instant.timestamp_subsec_nanos();
    let kept = nanos - nanos % NANOS_PER_MILLI;
    DateTime::from_timestamp(instant.timestamp(), kept).unwrap_or(instant)
}

/// Formats an instant for display in `zone`.
#[must_use]
pub fn display(instant: DateTime<Utc>, zone: Tz) -> String {
    zone.from_utc_datetime(&instant.naive_utc())
        .format(DISPLAY_FORMAT)
        .to_string()
}
