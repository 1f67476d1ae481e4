//! The timer entity and its invariants.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single tracked work interval.
///
/// A timer with no `stop` is *running*. The ledger-wide invariants (at most
/// one running timer, no overlapping intervals) are enforced by the storage
/// backends via [`check_against_ledger`]; [`Timer::validate`] covers the
/// structural invariants of a single record.
///
/// # Timestamp precision
///
/// `start` and `stop` are carried at second precision and serialized as
/// RFC 3339 UTC text (e.g. `2024-01-15T09:00:00Z`). With the fixed format,
/// lexicographic ordering of the stored text matches chronological
/// ordering, which the SQLite backend's triggers and push-down predicates
/// rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Unique identifier, immutable after creation.
    pub id: Uuid,
    /// When tracking began. Never the zero timestamp.
    #[serde(with = "second_precision")]
    pub start: DateTime<Utc>,
    /// When tracking ended; absent while the timer is running.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "second_precision::option"
    )]
    pub stop: Option<DateTime<Utc>>,
    /// Non-empty project name classifying the work.
    pub project: String,
    /// Optional finer-grained classification under `project`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Free-form labels, treated as a set when matching.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Timer {
    /// Creates a new running timer with a fresh id, validating the result.
    pub fn new(
        project: impl Into<String>,
        task: Option<String>,
        tags: Vec<String>,
        start: DateTime<Utc>,
    ) -> Result<Self> {
        let timer = Self {
            id: Uuid::new_v4(),
            start: truncate_to_seconds(start),
            stop: None,
            project: project.into(),
            task,
            tags,
        };
        timer.validate()?;
        Ok(timer)
    }

    /// How long the timer ran, or has been running as of `now`.
    #[must_use]
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.stop.unwrap_or(now) - self.start
    }

    /// Whether the timer has no recorded stop time.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.stop.is_none()
    }

    /// The calendar day (UTC) the timer started on.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Whether the half-open intervals of the two timers intersect.
    ///
    /// A running timer's interval is treated as open-ended.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let starts_before_other_ends = match other.stop {
            Some(stop) => self.start < stop,
            None => true,
        };
        let other_starts_before_end = match self.stop {
            Some(stop) => other.start < stop,
            None => true,
        };
        starts_before_other_ends && other_starts_before_end
    }

    /// Checks the structural invariants of this record.
    ///
    /// Fails with [`Error::InvalidTimer`] if the id is nil, the stop time is
    /// not strictly after the start time, or the project is empty. Pure, no
    /// I/O; ledger-wide invariants are checked separately.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_nil() {
            return Err(Error::invalid_timer("id is the nil uuid"));
        }
        if let Some(stop) = self.stop {
            if stop <= self.start {
                return Err(Error::invalid_timer("stop time is not after start time"));
            }
        }
        if self.project.is_empty() {
            return Err(Error::invalid_timer("project is an empty string"));
        }
        Ok(())
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID     : {}", self.id)?;
        writeln!(f, "Start  : {}", self.start.format("%Y-%m-%d %H:%M:%S"))?;
        if let Some(stop) = self.stop {
            writeln!(f, "Stop   : {}", stop.format("%Y-%m-%d %H:%M:%S"))?;
        }
        write!(f, "Project: {}", self.project)?;
        if let Some(task) = &self.task {
            write!(f, "\nTask   : {task}")?;
        }
        if !self.tags.is_empty() {
            write!(f, "\nTags   : {}", self.tags.join(", "))?;
        }
        Ok(())
    }
}

/// Checks a candidate write against a snapshot of the ledger.
///
/// Enforces the two ledger-wide invariants: at most one running timer, and
/// no overlapping intervals. A record in `existing` with the candidate's own
/// id is skipped, so the same function covers both inserts and updates.
/// Both storage backends call this before committing; only the triggering
/// mechanism differs per backend.
pub fn check_against_ledger<'a>(
    candidate: &Timer,
    existing: impl IntoIterator<Item = &'a Timer>,
) -> Result<()> {
    for timer in existing {
        if timer.id == candidate.id {
            continue;
        }
        if candidate.is_running() && timer.is_running() {
            return Err(Error::conflict(format!(
                "a running timer already exists ({})",
                timer.id
            )));
        }
        if candidate.overlaps(timer) {
            return Err(Error::conflict(format!(
                "timer overlaps an existing timer ({})",
                timer.id
            )));
        }
    }
    Ok(())
}

/// Drops sub-second precision so the serialized form is stable.
#[must_use]
pub fn truncate_to_seconds(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}

/// Serde helpers pinning timestamps to second-precision RFC 3339 UTC text.
pub(crate) mod second_precision {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub(crate) fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|parsed| super::truncate_to_seconds(parsed.with_timezone(&Utc)))
    }

    pub mod option {
        use chrono::{DateTime, SecondsFormat, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(timestamp) => serializer
                    .serialize_some(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).map_err(D::Error::custom),
                None => Ok(None),
            }
        }
    }
}
