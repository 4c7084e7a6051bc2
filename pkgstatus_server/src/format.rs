//! Human-readable formatting for build timestamps and durations.

use std::fmt::Write;

use chrono::DateTime;

pub const DEFAULT_DATETIME: &str = "%Y-%m-%d %H:%M";

/// Format a number of seconds as `H:MM:SS`.
pub fn duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    let (hours, remainder) = (seconds / 3600, seconds % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    format!("{sign}{hours}:{minutes:02}:{seconds:02}")
}

/// Format a Unix timestamp in UTC. Out-of-range timestamps and invalid
/// patterns yield `None`.
pub fn datetime(timestamp: i64, fmt: &str) -> Option<String> {
    let dt = DateTime::from_timestamp(timestamp, 0)?;
    let mut out = String::new();
    write!(out, "{}", dt.format(fmt)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_pads_minutes_and_seconds() {
        assert_eq!(duration(0), "0:00:00");
        assert_eq!(duration(59), "0:00:59");
        assert_eq!(duration(3661), "1:01:01");
        assert_eq!(duration(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn datetime_is_utc() {
        assert_eq!(
            datetime(1_700_000_000, DEFAULT_DATETIME).as_deref(),
            Some("2023-11-14 22:13")
        );
        assert_eq!(datetime(0, "%Y").as_deref(), Some("1970"));
    }

    #[test]
    fn datetime_rejects_bad_pattern() {
        assert_eq!(datetime(0, "%Q"), None);
        assert_eq!(datetime(i64::MAX, DEFAULT_DATETIME), None);
    }
}
