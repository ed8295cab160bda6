//! `HHMM` time parsing and rollover-aware differences.

use chrono::{Duration, NaiveTime};

use crate::error::ParseError;

/// Format of every scheduled and actual time field.
pub const TIME_FORMAT: &str = "%H%M";

/// Differences larger than this (in either direction) are treated as a
/// midnight crossing rather than a real duration.
pub const DEFAULT_ROLLOVER_THRESHOLD_MINUTES: f64 = 500.0;

/// Parses a 4-digit 24-hour `HHMM` string into a time of day.
///
/// # Errors
///
/// Returns [`ParseError::InvalidTime`] if `s` is not exactly four ASCII digits
/// forming a valid time.
pub fn parse_time(s: &str) -> Result<NaiveTime, ParseError> {
    let invalid = || ParseError::InvalidTime {
        value: s.to_string(),
    };

    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| invalid())
}

/// Returns `t2 - t1` in minutes.
///
/// When the naive same-day difference exceeds `rollover_threshold` in
/// magnitude, `t2` is moved to the following day and the difference is
/// recomputed.
pub fn time_difference_minutes(
    t1: &str,
    t2: &str,
    rollover_threshold: f64,
) -> Result<f64, ParseError> {
    let start = parse_time(t1)?;
    let end = parse_time(t2)?;

    let mut diff = end - start;
    if minutes(diff).abs() > rollover_threshold {
        diff += Duration::days(1);
    }

    Ok(minutes(diff))
}

fn minutes(d: Duration) -> f64 {
    d.num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(t1: &str, t2: &str) -> f64 {
        time_difference_minutes(t1, t2, DEFAULT_ROLLOVER_THRESHOLD_MINUTES).unwrap()
    }

    #[test]
    fn test_parse_valid_time() {
        let t = parse_time("0815").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_sentinels_and_garbage() {
        for value in ["starting", "terminating", "", "815", "08:15", "2460", "2500", " 815"] {
            assert_eq!(
                parse_time(value),
                Err(ParseError::InvalidTime {
                    value: value.to_string()
                }),
                "{value:?} should not parse"
            );
        }
    }

    #[test]
    fn test_simple_difference() {
        assert_eq!(diff("0800", "0815"), 15.0);
    }

    #[test]
    fn test_midnight_rollover() {
        assert_eq!(diff("2300", "0100"), 120.0);
        assert_eq!(diff("2355", "0005"), 10.0);
    }

    #[test]
    fn test_small_negative_difference_is_kept() {
        // early running: no rollover below the threshold
        assert_eq!(diff("1010", "1005"), -5.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // exactly 500 minutes stays a same-day difference
        assert_eq!(diff("0000", "0820"), 500.0);
        assert_eq!(diff("0000", "0821"), 501.0 + 1440.0);
    }

    #[test]
    fn test_custom_threshold() {
        assert_eq!(time_difference_minutes("2300", "0100", 2000.0).unwrap(), -1320.0);
    }

    #[test]
    fn test_malformed_input_is_reported() {
        let err = time_difference_minutes("0800", "starting", 500.0).unwrap_err();
        assert_eq!(err.to_string(), "Time \"starting\" is not a valid HHMM string");
    }
}
