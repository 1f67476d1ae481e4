//! Filter parsing, in-memory matching, and SQL push-down.
//!
//! A [`Filter`] has two consumers: [`Filter::matches`] is the exact
//! in-memory predicate, and [`Filter::sql`] renders a best-effort predicate
//! for the SQLite backend. The push-down may over-select (tag membership
//! cannot be expressed precisely against the serialized tag list) but must
//! never under-select; callers always re-apply `matches` on the returned
//! rows, so the in-memory predicate is the single source of truth.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::timer::Timer;

const KEY_PROJECT: &str = "project";
const KEY_TASK: &str = "task";
const KEY_TAGS: &str = "tags";
const KEY_SINCE: &str = "since";
const KEY_UNTIL: &str = "until";

/// Format accepted for `since`/`until` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A transient query over timer attributes and a date range.
///
/// Absent fields mean "no constraint on this dimension"; the default filter
/// matches everything. `since` and `until` are both inclusive, `until`
/// covering the whole named day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    projects: Option<Vec<String>>,
    tasks: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
}

impl Filter {
    /// Builds a filter directly, bypassing the string grammar.
    #[must_use]
    pub const fn new(
        projects: Option<Vec<String>>,
        tasks: Option<Vec<String>>,
        tags: Option<Vec<String>>,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Self {
        Self {
            projects,
            tasks,
            tags,
            since,
            until,
        }
    }

    /// Whether no dimension is constrained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.projects.is_none()
            && self.tasks.is_none()
            && self.tags.is_none()
            && self.since.is_none()
            && self.until.is_none()
    }

    /// The exact in-memory predicate: a conjunction of per-key checks.
    ///
    /// A timer without a task matches a task constraint only if the
    /// constraint contains the empty string. The tag constraint is
    /// match-any-of against the timer's tag set.
    #[must_use]
    pub fn matches(&self, timer: &Timer) -> bool {
        if let Some(projects) = &self.projects {
            if !projects.iter().any(|p| *p == timer.project) {
                return false;
            }
        }
        if let Some(tasks) = &self.tasks {
            let task = timer.task.as_deref().unwrap_or("");
            if !tasks.iter().any(|t| t == task) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if timer.start < day_start(since) {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timer.start >= day_end(until) {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.iter().any(|tag| timer.tags.contains(tag)) {
                return false;
            }
        }
        true
    }

    /// Renders the push-down predicate for the SQLite backend.
    ///
    /// Returns a WHERE-clause fragment with `?` placeholders and its
    /// parameters, operating on the stored `json` column. The fragment is
    /// allowed to over-select (the tag test is a substring match over the
    /// serialized tag list) but never under-selects; the caller re-applies
    /// [`Filter::matches`] on every returned row.
    #[must_use]
    pub fn sql(&self) -> (String, Vec<String>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(projects) = &self.projects {
            clauses.push(in_clause("$.project", projects.len()));
            params.extend(projects.iter().cloned());
        }
        if let Some(tasks) = &self.tasks {
            let mut clause = in_clause("$.task", tasks.len());
            if tasks.iter().any(String::is_empty) {
                // a timer without a task stores no field at all; IN () never
                // matches NULL, so the empty-string constraint needs it
                clause = format!("({clause} OR json_extract(json, '$.task') IS NULL)");
            }
            clauses.push(clause);
            params.extend(tasks.iter().cloned());
        }
        if let Some(tags) = &self.tags {
            let likes = vec!["json_extract(json, '$.tags') LIKE ?"; tags.len()];
            clauses.push(format!("({})", likes.join(" OR ")));
            params.extend(tags.iter().map(|tag| format!("%{tag}%")));
        }
        if let Some(since) = self.since {
            clauses.push("json_extract(json, '$.start') >= ?".to_string());
            params.push(timestamp_param(day_start(since)));
        }
        if let Some(until) = self.until {
            clauses.push("json_extract(json, '$.start') < ?".to_string());
            params.push(timestamp_param(day_end(until)));
        }

        if clauses.is_empty() {
            return ("TRUE".to_string(), params);
        }
        (clauses.join(" AND "), params)
    }
}

/// Parses the compact `key=v1,v2;key2=v3` filter grammar.
///
/// Recognized keys are `project`, `task` and `tags` (comma-separated
/// lists) plus `since` and `until` (single `YYYY-MM-DD` dates). Unknown
/// keys and redeclared keys fail with [`Error::InvalidData`]. The empty
/// string parses to the match-all filter.
impl std::str::FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut filter = Self::default();
        if s.is_empty() {
            return Ok(filter);
        }
        for clause in s.split(';') {
            let Some((key, values)) = clause.split_once('=') else {
                return Err(Error::invalid_data(format!(
                    "expected 'key=values' but got {clause:?}"
                )));
            };
            if values.contains('=') {
                return Err(Error::invalid_data(format!(
                    "expected a single '=' in {clause:?}"
                )));
            }
            filter.apply(key, values)?;
        }
        Ok(filter)
    }
}

impl Filter {
    fn apply(&mut self, key: &str, values: &str) -> Result<()> {
        match key {
            KEY_PROJECT => set_list(&mut self.projects, key, values),
            KEY_TASK => set_list(&mut self.tasks, key, values),
            KEY_TAGS => set_list(&mut self.tags, key, values),
            KEY_SINCE => set_date(&mut self.since, key, values),
            KEY_UNTIL => set_date(&mut self.until, key, values),
            _ => Err(Error::invalid_data(format!("unknown filter key {key:?}"))),
        }
    }
}

fn set_list(slot: &mut Option<Vec<String>>, key: &str, values: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::invalid_data(format!("redeclared filter key {key:?}")));
    }
    *slot = Some(values.split(',').map(str::to_string).collect());
    Ok(())
}

fn set_date(slot: &mut Option<NaiveDate>, key: &str, value: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::invalid_data(format!("redeclared filter key {key:?}")));
    }
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|err| Error::invalid_data(format!("invalid date for {key:?}: {err}")))?;
    *slot = Some(date);
    Ok(())
}

/// Midnight UTC at the start of `day`.
pub(crate) fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight UTC after the end of `day` (exclusive bound).
pub(crate) fn day_end(day: NaiveDate) -> DateTime<Utc> {
    day_start(day.checked_add_days(Days::new(1)).unwrap_or(day))
}

fn timestamp_param(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn in_clause(path: &str, count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");
    format!("json_extract(json, '{path}') IN ({placeholders})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn timer(project: &str, task: Option<&str>, tags: &[&str], start: &str) -> Timer {
        let start = DateTime::parse_from_rfc3339(start)
            .unwrap()
            .with_timezone(&Utc);
        Timer {
            id: Uuid::new_v4(),
            start,
            stop: Some(start + Duration::hours(1)),
            project: project.to_string(),
            task: task.map(str::to_string),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&timer("writing", None, &[], "2024-01-15T09:00:00Z")));
    }

    #[test]
    fn parse_full_grammar() {
        let filter: Filter = "project=writing,coding;task=draft;tags=deep,focus;since=2024-01-01;until=2024-01-31"
            .parse()
            .unwrap();
        assert!(filter.matches(&timer(
            "coding",
            Some("draft"),
            &["focus"],
            "2024-01-15T09:00:00Z"
        )));
    }

    #[test]
    fn parse_rejects_redeclared_key() {
        let result = "project=a;project=b".parse::<Filter>();
        assert!(matches!(result, Err(Error::InvalidData(_))));
        let result = "since=2024-01-01;since=2024-02-01".parse::<Filter>();
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn parse_rejects_unknown_key() {
        let result = "color=red".parse::<Filter>();
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn parse_rejects_malformed_clause() {
        assert!("project".parse::<Filter>().is_err());
        assert!("project=a=b".parse::<Filter>().is_err());
    }

    #[test]
    fn parse_rejects_malformed_date() {
        let result = "since=01.02.2024".parse::<Filter>();
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn date_range_is_inclusive_of_both_days() {
        let filter: Filter = "since=2024-01-01;until=2024-01-31".parse().unwrap();
        assert!(filter.matches(&timer("w", None, &[], "2024-01-01T00:00:00Z")));
        assert!(filter.matches(&timer("w", None, &[], "2024-01-31T23:59:00Z")));
        assert!(!filter.matches(&timer("w", None, &[], "2023-12-31T23:59:00Z")));
        assert!(!filter.matches(&timer("w", None, &[], "2024-02-01T00:00:00Z")));
    }

    #[test]
    fn project_set_excludes_other_projects() {
        let filter: Filter = "project=writing,coding;since=2024-01-01;until=2024-01-31"
            .parse()
            .unwrap();
        assert!(filter.matches(&timer("coding", None, &[], "2024-01-15T09:00:00Z")));
        assert!(!filter.matches(&timer("coding", None, &[], "2024-02-01T09:00:00Z")));
        assert!(!filter.matches(&timer("reading", None, &[], "2024-01-15T09:00:00Z")));
    }

    #[test]
    fn task_constraint_handles_missing_task() {
        let filter: Filter = "task=draft".parse().unwrap();
        assert!(filter.matches(&timer("w", Some("draft"), &[], "2024-01-15T09:00:00Z")));
        assert!(!filter.matches(&timer("w", None, &[], "2024-01-15T09:00:00Z")));

        let empty_task: Filter = "task=".parse().unwrap();
        assert!(empty_task.matches(&timer("w", None, &[], "2024-01-15T09:00:00Z")));
    }

    #[test]
    fn tags_match_any_of() {
        let filter: Filter = "tags=deep,review".parse().unwrap();
        assert!(filter.matches(&timer("w", None, &["review"], "2024-01-15T09:00:00Z")));
        assert!(!filter.matches(&timer("w", None, &["shallow"], "2024-01-15T09:00:00Z")));
    }

    #[test]
    fn match_is_conjunction_of_clauses() {
        let filter: Filter = "project=writing;tags=deep".parse().unwrap();
        assert!(!filter.matches(&timer("writing", None, &[], "2024-01-15T09:00:00Z")));
        assert!(!filter.matches(&timer("coding", None, &["deep"], "2024-01-15T09:00:00Z")));
        assert!(filter.matches(&timer("writing", None, &["deep"], "2024-01-15T09:00:00Z")));
    }

    #[test]
    fn empty_filter_sql_matches_all() {
        let (clause, params) = Filter::default().sql();
        assert_eq!(clause, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn sql_renders_placeholders_for_every_value() {
        let filter: Filter = "project=a,b;tags=x;since=2024-01-01;until=2024-01-31"
            .parse()
            .unwrap();
        let (clause, params) = filter.sql();
        assert_eq!(clause.matches('?').count(), params.len());
        assert_eq!(params.len(), 5);
        assert!(clause.contains("IN (?, ?)"));
        assert!(clause.contains("LIKE ?"));
        assert_eq!(params[2], "%x%");
        assert_eq!(params[3], "2024-01-01T00:00:00Z");
        assert_eq!(params[4], "2024-02-01T00:00:00Z");
    }

    #[test]
    fn sql_covers_missing_task_for_empty_string_constraint() {
        let filter: Filter = "task=".parse().unwrap();
        let (clause, _) = filter.sql();
        assert!(clause.contains("IS NULL"));
    }
}
