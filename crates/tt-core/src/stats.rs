//! Worked/planned aggregation over sets of timers.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::schedule::WorkSchedule;
use crate::timer::Timer;
use crate::vacation::VacationDay;

/// Bucket name for timers without a task in per-task breakdowns.
pub const NO_TASK: &str = "no-task";

/// Vacation calendar handed in by the caller, keyed by day.
///
/// Built from storage before aggregation so the engine stays free of I/O.
pub type VacationMap = HashMap<NaiveDate, VacationDay>;

/// A computed, transient aggregate. Never persisted; recomputed per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistic {
    /// Total time of all stopped timers in the set.
    #[serde(with = "duration_secs")]
    pub worked: Duration,
    /// Scheduled time over the calendar span of the set.
    #[serde(with = "duration_secs")]
    pub planned: Duration,
    /// `worked - planned`.
    #[serde(with = "duration_secs")]
    pub difference: Duration,
    /// `worked / planned`; exactly `0` when nothing was planned.
    pub percentage: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub by_projects: Vec<ProjectStats>,
}

/// Per-project slice of a [`Statistic`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub name: String,
    #[serde(with = "duration_secs")]
    pub worked: Duration,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub by_tasks: Vec<TaskStats>,
}

/// Per-task slice of a [`ProjectStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub name: String,
    #[serde(with = "duration_secs")]
    pub worked: Duration,
}

/// Aggregates a set of timers into a single [`Statistic`].
///
/// `worked` sums the durations of all stopped timers; a still-running timer
/// is excluded so a point-in-time report stays deterministic. `planned`
/// walks every calendar day spanned by the set and adds the schedule's
/// contribution for that day, honoring the vacation calendar. With
/// `by_project` the statistic carries one breakdown per distinct project,
/// and `by_task` further splits each project by task.
#[must_use]
pub fn aggregate(
    timers: &[Timer],
    schedule: &WorkSchedule,
    vacations: &VacationMap,
    by_project: bool,
    by_task: bool,
) -> Statistic {
    let worked = worked_time(timers);
    let planned = planned_time(timers, schedule, vacations);
    let percentage = if planned.is_zero() {
        0.0
    } else {
        to_seconds_f64(worked) / to_seconds_f64(planned)
    };
    let by_projects = if by_project {
        project_breakdown(timers, by_task)
    } else {
        Vec::new()
    };
    Statistic {
        worked,
        planned,
        difference: worked - planned,
        percentage,
        by_projects,
    }
}

/// Runs [`aggregate`] independently for each calendar day spanned by the
/// set, keyed by day. Days without worked time still appear with their
/// planned contribution; filtering them out is a presentation concern.
#[must_use]
pub fn aggregate_by_day(
    timers: &[Timer],
    schedule: &WorkSchedule,
    vacations: &VacationMap,
    by_project: bool,
    by_task: bool,
) -> BTreeMap<NaiveDate, Statistic> {
    let mut statistics = BTreeMap::new();
    let Some((first, last)) = calendar_span(timers) else {
        return statistics;
    };
    tracing::debug!(%first, %last, timers = timers.len(), "aggregating by day");

    let mut day = first;
    while day <= last {
        let subset: Vec<Timer> = timers
            .iter()
            .filter(|timer| timer.day() == day)
            .cloned()
            .collect();
        statistics.insert(
            day,
            aggregate(&subset, schedule, vacations, by_project, by_task),
        );
        let Some(next) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        day = next;
    }
    statistics
}

/// Sum of durations over the stopped timers in the set.
#[must_use]
pub fn worked_time(timers: &[Timer]) -> Duration {
    let now = Utc::now();
    timers
        .iter()
        .filter(|timer| !timer.is_running())
        .fold(Duration::zero(), |total, timer| {
            total + timer.duration(now)
        })
}

/// Scheduled time over every calendar day spanned by the set.
#[must_use]
pub fn planned_time(
    timers: &[Timer],
    schedule: &WorkSchedule,
    vacations: &VacationMap,
) -> Duration {
    let Some((first, last)) = calendar_span(timers) else {
        return Duration::zero();
    };
    let mut planned = Duration::zero();
    let mut day = first;
    while day <= last {
        planned += schedule.planned_for_day(day, vacations.get(&day));
        let Some(next) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        day = next;
    }
    planned
}

/// First and last calendar day touched by the set, or `None` if empty.
///
/// A running timer contributes only its start day; its open end does not
/// extend the span.
fn calendar_span(timers: &[Timer]) -> Option<(NaiveDate, NaiveDate)> {
    let first = timers.iter().map(Timer::day).min()?;
    let last = timers
        .iter()
        .map(|timer| timer.stop.map_or_else(|| timer.day(), |stop| stop.date_naive()))
        .max()?;
    Some((first, last))
}

fn project_breakdown(timers: &[Timer], by_task: bool) -> Vec<ProjectStats> {
    let mut groups: BTreeMap<&str, Vec<Timer>> = BTreeMap::new();
    for timer in timers {
        groups.entry(&timer.project).or_default().push(timer.clone());
    }
    groups
        .into_iter()
        .map(|(name, group)| ProjectStats {
            name: name.to_string(),
            worked: worked_time(&group),
            by_tasks: if by_task {
                task_breakdown(&group)
            } else {
                Vec::new()
            },
        })
        .collect()
}

fn task_breakdown(timers: &[Timer]) -> Vec<TaskStats> {
    let mut groups: BTreeMap<&str, Vec<Timer>> = BTreeMap::new();
    for timer in timers {
        let key = timer.task.as_deref().unwrap_or(NO_TASK);
        groups.entry(key).or_default().push(timer.clone());
    }
    groups
        .into_iter()
        .map(|(name, group)| TaskStats {
            name: name.to_string(),
            worked: worked_time(&group),
        })
        .collect()
}

#[expect(clippy::cast_precision_loss, reason = "durations are far below 2^52 seconds")]
fn to_seconds_f64(duration: Duration) -> f64 {
    duration.num_seconds() as f64
}

/// Precision human-readable durations are rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[serde(alias = "h")]
    Hour,
    #[serde(alias = "m")]
    Minute,
    #[default]
    #[serde(alias = "s")]
    Second,
}

/// Formats a duration as `3h`, `3h24m` or `3h24m10s` depending on the
/// configured precision. Negative durations carry a leading sign.
#[must_use]
pub fn format_duration(duration: Duration, precision: Precision) -> String {
    let total_seconds = duration.num_seconds();
    let sign = if total_seconds < 0 { "-" } else { "" };
    let total_seconds = total_seconds.abs();
    let hours = total_seconds / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;
    match precision {
        Precision::Hour => format!("{sign}{hours}h"),
        Precision::Minute => format!("{sign}{hours}h{minutes}m"),
        Precision::Second => format!("{sign}{hours}h{minutes}m{seconds}s"),
    }
}

/// Serializes durations as whole seconds.
mod duration_secs {
    use chrono::Duration;
    use serde::Serializer;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.num_seconds())
    }
}
