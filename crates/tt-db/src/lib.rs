//! Storage backends for the timer ledger.
//!
//! Two implementations of one [`Storage`] contract:
//!
//! - [`FileStorage`] holds the full collection in memory and rewrites a
//!   single JSON document on every mutation. Not safe for concurrent
//!   processes; callers must serialize access externally.
//! - [`SqliteStorage`] stores one row per record with the serialized entity
//!   in a `json` column, backed by `rusqlite`. Database triggers re-check
//!   the ledger-wide invariants at commit time, which makes them the only
//!   safety net when several processes share the database file.
//!
//! Both backends run the same in-process ledger check
//! ([`tt_core::check_against_ledger`]) before accepting a write, so their
//! behavior cannot drift; only the triggering mechanism differs.
//!
//! # Filter push-down
//!
//! The SQLite backend pushes [`Filter::sql`] down into its queries and then
//! always re-applies [`Filter::matches`] on the returned rows. The
//! push-down may over-select but never under-selects, so the re-check
//! yields exactly the set the in-memory predicate defines.

mod file;
mod sqlite;

use chrono::NaiveDate;
use tt_core::{Direction, Filter, OrderBy, Result, Timer, VacationDay};
use uuid::Uuid;

pub use file::FileStorage;
pub use sqlite::SqliteStorage;

/// The storage contract both backends implement.
///
/// Lookups that can come up empty return [`tt_core::Error::NotFound`] as a
/// first-class outcome, except [`Storage::get_timers`] which returns an
/// empty list. Writes validate the structural invariants and enforce the
/// ledger-wide ones (single running timer, no overlaps) before committing;
/// violations surface as [`tt_core::Error::Conflict`].
pub trait Storage {
    /// Validates and durably records a new timer.
    fn save_timer(&mut self, timer: &Timer) -> Result<()>;

    /// Returns the first timer matching `filter` under `order`.
    fn get_timer(&self, filter: &Filter, order: OrderBy) -> Result<Timer>;

    /// Returns the timer with the given id.
    fn get_timer_by_id(&self, id: Uuid) -> Result<Timer>;

    /// Returns all timers matching `filter`, sorted by `order`.
    fn get_timers(&self, filter: &Filter, order: OrderBy) -> Result<Vec<Timer>>;

    /// Replaces the record with the same id, re-validating all invariants.
    /// The record being replaced is excluded from the ledger check, so
    /// stopping a running timer is an ordinary update.
    fn update_timer(&mut self, timer: &Timer) -> Result<()>;

    /// Removes the timer with the given id.
    fn remove_timer(&mut self, id: Uuid) -> Result<()>;

    /// Records a vacation day. Each calendar date may be recorded once;
    /// a second record for the same date fails with
    /// [`tt_core::Error::Conflict`].
    fn save_vacation_day(&mut self, vacation: &VacationDay) -> Result<()>;

    /// Returns the vacation day on the given calendar date.
    fn vacation_day_on(&self, day: NaiveDate) -> Result<VacationDay>;

    /// Returns all vacation days ordered by date.
    fn get_vacation_days(&self, direction: Direction) -> Result<Vec<VacationDay>>;

    /// Removes the vacation day with the given id.
    fn remove_vacation_day(&mut self, id: Uuid) -> Result<()>;
}

/// Loads the full vacation calendar as the map the statistics engine
/// consumes.
pub fn vacation_map(storage: &dyn Storage) -> Result<tt_core::VacationMap> {
    let days = storage.get_vacation_days(Direction::Ascending)?;
    Ok(days
        .into_iter()
        .map(|vacation| (vacation.day, vacation))
        .collect())
}
