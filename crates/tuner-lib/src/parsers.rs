//! Field parsers for trace columns
//!
//! Every parser except the submit timestamp is lenient: malformed or missing
//! input yields `None` and only that metric is dropped from the record.

use crate::error::{Result, TunerError};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+)m)?\s*(\d+(?:\.\d+)?)s").expect("duration regex is valid")
});
static MEMORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)\s*(KB|MB|GB|TB)").expect("memory regex is valid"));
static CPU_PERCENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)%").expect("cpu percent regex is valid"));
static SUBMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{1,6}$").expect("submit regex is valid")
});

/// Format of the `submit` column
///
/// chrono's `%.f` also accepts a missing or nanosecond fraction, so
/// `parse_submit` checks the shape against `SUBMIT_PATTERN` first.
pub const SUBMIT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const MB_PER_GB: f64 = 1024.0;

/// Parse a realtime value such as `13m 44s` or `46.3s` into seconds
pub fn parse_duration(value: Option<&str>) -> Option<f64> {
    let value = non_empty(value)?;
    let caps = DURATION_PATTERN.captures(value)?;
    let minutes: f64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let seconds: f64 = caps.get(2)?.as_str().parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

/// Parse a memory value such as `1.5 GB` into megabytes
pub fn parse_memory(value: Option<&str>) -> Option<f64> {
    let value = non_empty(value)?;
    let caps = MEMORY_PATTERN.captures(value)?;
    let size: f64 = caps.get(1)?.as_str().parse().ok()?;
    let multiplier = match caps.get(2)?.as_str() {
        "KB" => 1.0 / 1024.0,
        "MB" => 1.0,
        "GB" => MB_PER_GB,
        "TB" => MB_PER_GB * MB_PER_GB,
        _ => return None,
    };
    Some(size * multiplier)
}

/// Parse a CPU utilisation value such as `98.4%`
pub fn parse_cpu_percent(value: Option<&str>) -> Option<f64> {
    let value = non_empty(value)?;
    CPU_PERCENT_PATTERN
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn parse_int(value: Option<&str>) -> Option<i64> {
    value?.trim().parse().ok()
}

/// Parse a submit timestamp (`YYYY-MM-DD HH:MM:SS.ffffff`, UTC) into epoch seconds
///
/// Unlike the other parsers this one fails hard: a malformed timestamp means
/// the trace itself is corrupt.
pub fn parse_submit(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    if !SUBMIT_PATTERN.is_match(trimmed) {
        return Err(TunerError::InvalidTimestamp {
            value: value.to_string(),
            source: None,
        });
    }
    let parsed = NaiveDateTime::parse_from_str(trimmed, SUBMIT_FORMAT).map_err(|source| {
        TunerError::InvalidTimestamp {
            value: value.to_string(),
            source: Some(source),
        }
    })?;
    Ok(parsed.and_utc().timestamp_micros() as f64 / 1_000_000.0)
}

/// Task type identity: the raw name up to the first `(`, trimmed
pub fn process_name(raw: &str) -> &str {
    raw.split('(').next().unwrap_or(raw).trim()
}

/// Convert megabytes to whole gigabytes, rounding half to even, never below 1
pub fn gb_round(mb: f64) -> u64 {
    let gb = (mb / MB_PER_GB).round_ties_even();
    if gb < 1.0 {
        1
    } else {
        gb as u64
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(Some("13m 44s")), Some(824.0));
        assert_eq!(parse_duration(Some("46.3s")), Some(46.3));
        assert_eq!(parse_duration(Some("1s")), Some(1.0));
        assert_eq!(parse_duration(Some("2m3s")), Some(123.0));
        assert_eq!(parse_duration(None), None);
        assert_eq!(parse_duration(Some("")), None);
        assert_eq!(parse_duration(Some("no-match")), None);
        assert_eq!(parse_duration(Some("-")), None);
    }

    #[test]
    fn test_parse_memory() {
        assert_eq!(parse_memory(Some("1.5 GB")), Some(1536.0));
        assert_eq!(parse_memory(Some("2.6 MB")), Some(2.6));
        assert_eq!(parse_memory(Some("2GB")), Some(2048.0));
        assert_eq!(parse_memory(Some("512 KB")), Some(0.5));
        assert_eq!(parse_memory(Some("1 TB")), Some(1024.0 * 1024.0));
        assert_eq!(parse_memory(None), None);
        assert_eq!(parse_memory(Some("bad")), None);
        assert_eq!(parse_memory(Some("1.2.3 GB")), None);
    }

    #[test]
    fn test_parse_cpu_percent() {
        assert_eq!(parse_cpu_percent(Some("98.4%")), Some(98.4));
        assert_eq!(parse_cpu_percent(Some("250%")), Some(250.0));
        assert_eq!(parse_cpu_percent(None), None);
        assert_eq!(parse_cpu_percent(Some("nope")), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(Some("4")), Some(4));
        assert_eq!(parse_int(Some(" 2 ")), Some(2));
        assert_eq!(parse_int(Some("2.0")), None);
        assert_eq!(parse_int(Some("-")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn test_parse_submit() {
        let ts = parse_submit("2020-01-02 03:04:05.123456").unwrap();
        assert_eq!(ts.trunc() as i64, 1_577_934_245);
        assert!((ts.fract() - 0.123456).abs() < 1e-6);
    }

    #[test]
    fn test_parse_submit_rejects_malformed() {
        let err = parse_submit("2020/01/02 03:04:05").unwrap_err();
        assert!(matches!(err, TunerError::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("2020/01/02"));
    }

    #[test]
    fn test_parse_submit_requires_microsecond_fraction() {
        for value in [
            "2020-01-02 03:04:05",
            "2020-01-02 03:04:05.",
            "2020-01-02 03:04:05.123456789",
        ] {
            let err = parse_submit(value).unwrap_err();
            assert!(matches!(err, TunerError::InvalidTimestamp { .. }), "{value}");
        }

        // Shorter fractions are still fractions of a second
        let ts = parse_submit("2020-01-02 03:04:05.5").unwrap();
        assert!((ts - 1_577_934_245.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_submit_rejects_invalid_calendar_date() {
        let err = parse_submit("2020-02-30 03:04:05.000000").unwrap_err();
        assert!(matches!(
            err,
            TunerError::InvalidTimestamp {
                source: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_process_name() {
        assert_eq!(process_name("PROC (details)"), "PROC");
        assert_eq!(process_name("NAME"), "NAME");
        assert_eq!(process_name("  wf:ALIGN (sample_1) (2)"), "wf:ALIGN");
    }

    #[test]
    fn test_gb_round() {
        assert_eq!(gb_round(1536.0), 2);
        assert_eq!(gb_round(500.0), 1);
        assert_eq!(gb_round(0.0), 1);
        assert_eq!(gb_round(2560.0), 2);
        assert_eq!(gb_round(3584.0), 4);
        assert_eq!(gb_round(10_240.0), 10);
    }
}
