//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use tt_core::truncate_to_seconds;

/// Pre-compiled regex for "HH:MM" / "HH:MM:SS" clock times.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap());

/// Pre-compiled regex for "YYYY-MM-DD HH:MM[:SS]" timestamps.
static DATE_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[ T](\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap()
});

/// Parses a loosely formatted timestamp, filling missing parts from `now`.
///
/// Supports:
/// - RFC 3339: "2024-01-15T09:30:00Z"
/// - Clock time on today's date: "09:30", "9:30:15"
/// - Date plus clock time: "2024-01-15 09:30", "2024-01-15T09:30:15"
pub fn parse_timestamp(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Ok(truncate_to_seconds(timestamp.with_timezone(&Utc)));
    }

    if let Some(caps) = CLOCK_RE.captures(s) {
        let time = clock_time(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()))?;
        return Ok(now.date_naive().and_time(time).and_utc());
    }

    if let Some(caps) = DATE_CLOCK_RE.captures(s) {
        let day: NaiveDate = caps[1].parse().context("invalid calendar date")?;
        let time = clock_time(&caps[2], &caps[3], caps.get(4).map(|m| m.as_str()))?;
        return Ok(day.and_time(time).and_utc());
    }

    anyhow::bail!(
        "invalid timestamp: {s}. Use RFC 3339 (e.g. 2024-01-15T09:30:00Z), \
         \"HH:MM[:SS]\" or \"YYYY-MM-DD HH:MM[:SS]\""
    )
}

fn clock_time(hour: &str, minute: &str, second: Option<&str>) -> anyhow::Result<NaiveTime> {
    let hour: u32 = hour.parse().context("failed to parse hour")?;
    let minute: u32 = minute.parse().context("failed to parse minute")?;
    let second: u32 = second
        .map_or(Ok(0), str::parse)
        .context("failed to parse second")?;
    NaiveTime::from_hms_opt(hour, minute, second)
        .with_context(|| format!("clock time out of range: {hour:02}:{minute:02}:{second:02}"))
}
