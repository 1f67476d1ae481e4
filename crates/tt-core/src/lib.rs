//! Core domain logic for the timer ledger.
//!
//! This crate is pure: it defines the timer entity and its invariants, the
//! filter query language, the ordering specification, vacation days, the
//! weekly work schedule, and the statistics engine. All I/O lives in the
//! storage backends (`tt-db`) and the CLI (`tt-cli`).

pub mod error;
pub mod filter;
pub mod query;
pub mod schedule;
pub mod stats;
pub mod timer;
pub mod vacation;

pub use error::{Error, Result};
pub use filter::Filter;
pub use query::{Direction, Field, OrderBy};
pub use schedule::{WorkSchedule, Workdays};
pub use stats::{
    NO_TASK, Precision, ProjectStats, Statistic, TaskStats, VacationMap, aggregate,
    aggregate_by_day, format_duration, planned_time, worked_time,
};
pub use timer::{Timer, check_against_ledger, truncate_to_seconds};
pub use vacation::VacationDay;
