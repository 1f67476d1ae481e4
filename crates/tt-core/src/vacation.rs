//! Vacation days excluded from planned-time accounting.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar day (or half day) on which no work is planned.
///
/// Looked up by exact calendar date; the time of day plays no role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationDay {
    pub id: Uuid,
    pub day: NaiveDate,
    /// Half vacation days contribute half the configured daily hours.
    #[serde(default)]
    pub half: bool,
}

impl VacationDay {
    #[must_use]
    pub fn new(day: NaiveDate, half: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            day,
            half,
        }
    }
}

impl fmt::Display for VacationDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID  : {}\nDay : {}\nHalf: {}", self.id, self.day, self.half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_stores_day_as_plain_date() {
        let day = VacationDay::new(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), true);
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["day"], "2024-07-01");
        assert_eq!(json["half"], true);

        let parsed: VacationDay = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, day);
    }

    #[test]
    fn half_defaults_to_false() {
        let parsed: VacationDay = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000001","day":"2024-07-01"}"#,
        )
        .unwrap();
        assert!(!parsed.half);
    }
}
