//! Deadline Resolution
//!
//! Parses the heterogeneous deadline encodings seen at the ledger and form
//! boundaries into UTC instants, and derives time-remaining presentation
//! state. Typed boundaries declare their encoding through [`DeadlineSource`];
//! only [`parse_deadline_lenient`] sniffs untyped input, and the
//! seconds/milliseconds threshold it uses lives in one tested constant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Numeric deadlines at or above this value are treated as epoch
/// milliseconds, below it as epoch seconds. 10^12 seconds is year 33658;
/// 10^12 milliseconds is September 2001.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// A deadline together with the caller's declared encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DeadlineSource {
    /// Unix timestamp in seconds (the ledger's native encoding).
    EpochSeconds(i64),
    /// Unix timestamp in milliseconds.
    EpochMillis(i64),
    /// ISO-8601 / RFC 3339 datetime, datetime-local, or bare date.
    Iso(String),
}

/// Errors from deadline parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeadlineError {
    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),
}

/// Time left until a deadline, decomposed for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub is_expired: bool,
    /// Human label: non-zero leading units plus always the minutes,
    /// or "Ended" once expired.
    pub formatted: String,
}

/// Resolve a declared deadline encoding to a UTC instant.
pub fn parse_deadline(source: &DeadlineSource) -> Result<DateTime<Utc>, DeadlineError> {
    match source {
        DeadlineSource::EpochSeconds(secs) => Utc
            .timestamp_opt(*secs, 0)
            .single()
            .ok_or_else(|| DeadlineError::InvalidDeadline(format!("epoch seconds out of range: {}", secs))),
        DeadlineSource::EpochMillis(millis) => Utc
            .timestamp_millis_opt(*millis)
            .single()
            .ok_or_else(|| {
                DeadlineError::InvalidDeadline(format!("epoch milliseconds out of range: {}", millis))
            }),
        DeadlineSource::Iso(value) => parse_iso(value),
    }
}

/// Parse an untyped deadline string from external input.
///
/// A string containing a date/time separator is ISO; an all-digit string is
/// an epoch timestamp, disambiguated by [`MILLIS_THRESHOLD`]. This is the one
/// place the encoding is guessed instead of declared.
pub fn parse_deadline_lenient(input: &str) -> Result<DateTime<Utc>, DeadlineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DeadlineError::InvalidDeadline("empty input".to_string()));
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let numeric: i64 = trimmed
            .parse()
            .map_err(|_| DeadlineError::InvalidDeadline(format!("timestamp out of range: {}", trimmed)))?;
        let source = if numeric < MILLIS_THRESHOLD {
            DeadlineSource::EpochSeconds(numeric)
        } else {
            DeadlineSource::EpochMillis(numeric)
        };
        return parse_deadline(&source);
    }

    parse_iso(trimmed)
}

/// Compute the time left until `deadline` as of `now`.
///
/// The positive delta is decomposed by flooring at each step: whole days,
/// remaining hours, remaining minutes. A deadline at or before `now` is
/// expired.
pub fn time_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let delta_secs = (deadline - now).num_seconds();

    if delta_secs <= 0 {
        return TimeRemaining {
            days: 0,
            hours: 0,
            minutes: 0,
            is_expired: true,
            formatted: "Ended".to_string(),
        };
    }

    let total_minutes = delta_secs / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    let formatted = if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    };

    TimeRemaining {
        days,
        hours,
        minutes,
        is_expired: false,
        formatted,
    }
}

fn parse_iso(value: &str) -> Result<DateTime<Utc>, DeadlineError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    // HTML datetime-local and close variants, interpreted as UTC.
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(DeadlineError::InvalidDeadline(format!(
        "unrecognized date: {:?}",
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_millis(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    #[test]
    fn test_parse_epoch_seconds() {
        let instant = parse_deadline(&DeadlineSource::EpochSeconds(1_700_000_000)).unwrap();
        assert_eq!(instant.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_epoch_millis() {
        let instant = parse_deadline(&DeadlineSource::EpochMillis(1_700_000_000_123)).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_parse_iso_variants() {
        let rfc = parse_deadline(&DeadlineSource::Iso("2026-01-02T03:04:05Z".to_string())).unwrap();
        assert_eq!(rfc.timestamp(), 1_767_323_045);

        // datetime-local (no zone) is taken as UTC
        let local = parse_deadline(&DeadlineSource::Iso("2026-01-02T03:04".to_string())).unwrap();
        assert_eq!(local.timestamp(), rfc.timestamp() - 5);

        let date_only = parse_deadline(&DeadlineSource::Iso("2026-01-02".to_string())).unwrap();
        assert_eq!(date_only.timestamp() % 86_400, 0);
    }

    #[test]
    fn test_lenient_threshold_boundary() {
        // Just below the threshold: seconds.
        let below = parse_deadline_lenient("999999999999").unwrap();
        assert_eq!(below.timestamp(), 999_999_999_999);

        // Exactly at the threshold: milliseconds.
        let at = parse_deadline_lenient("1000000000000").unwrap();
        assert_eq!(at.timestamp_millis(), 1_000_000_000_000);
    }

    #[test]
    fn test_lenient_iso_detection() {
        let instant = parse_deadline_lenient("2026-06-01T12:00").unwrap();
        assert_eq!(instant.format("%Y-%m-%d %H:%M").to_string(), "2026-06-01 12:00");
    }

    #[test]
    fn test_invalid_deadlines() {
        assert!(parse_deadline_lenient("").is_err());
        assert!(parse_deadline_lenient("tomorrow").is_err());
        assert!(parse_deadline_lenient("2026-13-40").is_err());
        assert!(parse_deadline(&DeadlineSource::EpochSeconds(i64::MAX)).is_err());
    }

    #[test]
    fn test_time_remaining_decomposition() {
        // 1 day, 1 hour, 1 minute, 1 second ahead of epoch zero.
        let remaining = time_remaining(at_millis(90_061_000), at_millis(0));
        assert_eq!(remaining.days, 1);
        assert_eq!(remaining.hours, 1);
        assert_eq!(remaining.minutes, 1);
        assert!(!remaining.is_expired);
        assert_eq!(remaining.formatted, "1d 1h 1m");
    }

    #[test]
    fn test_time_remaining_expiry_is_inclusive() {
        let now = at_millis(1_000_000);
        assert!(time_remaining(at_millis(999_999), now).is_expired);
        assert!(time_remaining(now, now).is_expired);
        assert!(!time_remaining(at_millis(1_060_001), now).is_expired);
        assert_eq!(time_remaining(at_millis(999_999), now).formatted, "Ended");
    }

    #[test]
    fn test_time_remaining_formatting_drops_leading_zero_units() {
        let now = at_millis(0);
        assert_eq!(time_remaining(at_millis(2 * 3_600_000 + 3 * 60_000), now).formatted, "2h 3m");
        assert_eq!(time_remaining(at_millis(12 * 60_000), now).formatted, "12m");
        // Sub-minute remainder floors to zero minutes but is not expired.
        let soon = time_remaining(at_millis(30_000), now);
        assert!(!soon.is_expired);
        assert_eq!(soon.formatted, "0m");
    }
}
