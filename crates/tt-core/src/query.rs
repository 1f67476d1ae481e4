//! Result ordering shared by both storage backends.

use std::cmp::Ordering;

use crate::error::Error;
use crate::timer::Timer;

/// Timer attribute results can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    /// Start timestamp.
    #[default]
    Start,
    /// Project name.
    Project,
    /// Task name; timers without a task sort first.
    Task,
    /// Calendar day of the start timestamp.
    Day,
}

impl std::str::FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            "day" => Ok(Self::Day),
            _ => Err(Error::invalid_data(format!("unknown order field {s:?}"))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// An ordering specification: field plus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderBy {
    pub field: Field,
    pub direction: Direction,
}

impl OrderBy {
    #[must_use]
    pub const fn new(field: Field, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Most recent start first; the lookup order for the running timer.
    #[must_use]
    pub const fn latest_start() -> Self {
        Self::new(Field::Start, Direction::Descending)
    }

    /// In-memory comparator for the file backend.
    #[must_use]
    pub fn compare(&self, a: &Timer, b: &Timer) -> Ordering {
        let ordering = match self.field {
            Field::Start => a.start.cmp(&b.start),
            Field::Project => a.project.cmp(&b.project),
            Field::Task => a.task.cmp(&b.task),
            Field::Day => a.day().cmp(&b.day()),
        };
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    /// `ORDER BY` fragment over the stored JSON column.
    ///
    /// Sound because timestamps are serialized as fixed-width RFC 3339 UTC
    /// text (see [`Timer`]), so lexicographic order matches chronological
    /// order.
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match (self.field, self.direction) {
            (Field::Start, Direction::Ascending) => {
                "ORDER BY json_extract(json, '$.start') ASC"
            }
            (Field::Start, Direction::Descending) => {
                "ORDER BY json_extract(json, '$.start') DESC"
            }
            (Field::Project, Direction::Ascending) => {
                "ORDER BY json_extract(json, '$.project') ASC"
            }
            (Field::Project, Direction::Descending) => {
                "ORDER BY json_extract(json, '$.project') DESC"
            }
            (Field::Task, Direction::Ascending) => {
                "ORDER BY json_extract(json, '$.task') ASC"
            }
            (Field::Task, Direction::Descending) => {
                "ORDER BY json_extract(json, '$.task') DESC"
            }
            (Field::Day, Direction::Ascending) => {
                "ORDER BY date(json_extract(json, '$.start')) ASC"
            }
            (Field::Day, Direction::Descending) => {
                "ORDER BY date(json_extract(json, '$.start')) DESC"
            }
        }
    }
}
