//! Weekly work schedule and the single-day planned-time lookup.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::vacation::VacationDay;

/// Which weekdays count as work days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workdays {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for Workdays {
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }
}

/// The configured weekly schedule planned time is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkSchedule {
    /// Expected hours on each work day.
    pub hours_per_day: u32,
    pub workdays: Workdays,
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            hours_per_day: 8,
            workdays: Workdays::default(),
        }
    }
}

impl WorkSchedule {
    #[must_use]
    pub const fn is_work_day(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.workdays.monday,
            Weekday::Tue => self.workdays.tuesday,
            Weekday::Wed => self.workdays.wednesday,
            Weekday::Thu => self.workdays.thursday,
            Weekday::Fri => self.workdays.friday,
            Weekday::Sat => self.workdays.saturday,
            Weekday::Sun => self.workdays.sunday,
        }
    }

    /// Planned work time for a single calendar day.
    ///
    /// A day that is not a configured work day contributes zero regardless
    /// of vacation. A full vacation day contributes zero, a half vacation
    /// day half the configured hours.
    #[must_use]
    pub fn planned_for_day(&self, day: NaiveDate, vacation: Option<&VacationDay>) -> Duration {
        if !self.is_work_day(day.weekday()) {
            return Duration::zero();
        }
        let full = Duration::hours(i64::from(self.hours_per_day));
        match vacation {
            Some(vacation) if vacation.half => full / 2,
            Some(_) => Duration::zero(),
            None => full,
        }
    }
}
