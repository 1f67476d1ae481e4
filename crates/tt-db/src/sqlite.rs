//! SQLite backend: one row per record, entity serialized into a `json`
//! column, ledger invariants re-checked by database triggers.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::Connection;
use tt_core::{
    Direction, Error, Filter, OrderBy, Result, Timer, VacationDay, check_against_ledger,
};
use uuid::Uuid;

use crate::Storage;

// Open-ended running timers have no stop timestamp; the triggers
// substitute a far-future sentinel so the string comparison still works.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS timers (
    uuid TEXT PRIMARY KEY,
    json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vacation_days (
    uuid TEXT PRIMARY KEY,
    json TEXT NOT NULL
);

CREATE TRIGGER IF NOT EXISTS timers_no_overlap_insert
BEFORE INSERT ON timers
WHEN EXISTS (
    SELECT 1 FROM timers
    WHERE json_extract(json, '$.start')
        < COALESCE(json_extract(NEW.json, '$.stop'), '9999-12-31T23:59:59Z')
    AND COALESCE(json_extract(json, '$.stop'), '9999-12-31T23:59:59Z')
        > json_extract(NEW.json, '$.start')
)
BEGIN
    SELECT RAISE(ABORT, 'timer overlaps an existing timer');
END;

CREATE TRIGGER IF NOT EXISTS timers_no_overlap_update
BEFORE UPDATE ON timers
WHEN EXISTS (
    SELECT 1 FROM timers
    WHERE uuid <> NEW.uuid
    AND json_extract(json, '$.start')
        < COALESCE(json_extract(NEW.json, '$.stop'), '9999-12-31T23:59:59Z')
    AND COALESCE(json_extract(json, '$.stop'), '9999-12-31T23:59:59Z')
        > json_extract(NEW.json, '$.start')
)
BEGIN
    SELECT RAISE(ABORT, 'timer overlaps an existing timer');
END;

CREATE TRIGGER IF NOT EXISTS timers_single_running_insert
BEFORE INSERT ON timers
WHEN json_extract(NEW.json, '$.stop') IS NULL
AND EXISTS (
    SELECT 1 FROM timers WHERE json_extract(json, '$.stop') IS NULL
)
BEGIN
    SELECT RAISE(ABORT, 'a running timer already exists');
END;

CREATE TRIGGER IF NOT EXISTS timers_single_running_update
BEFORE UPDATE ON timers
WHEN json_extract(NEW.json, '$.stop') IS NULL
AND EXISTS (
    SELECT 1 FROM timers
    WHERE uuid <> NEW.uuid AND json_extract(json, '$.stop') IS NULL
)
BEGIN
    SELECT RAISE(ABORT, 'a running timer already exists');
END;
";

/// SQLite-backed storage.
///
/// Writes are checked twice: once in-process with the shared ledger check,
/// and again by the schema triggers, which are the only enforcement that
/// holds when several processes share the database file. Timestamps are
/// stored as second-precision RFC 3339 UTC text, so the triggers and the
/// filter push-down can compare them as strings.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (and if necessary initializes) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(Error::internal)?;
        tracing::debug!(path = %path.display(), "opened sqlite storage");
        Self::init(conn)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::internal)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(Error::internal)?;
        Ok(Self { conn })
    }

    fn all_timers(&self) -> Result<Vec<Timer>> {
        self.get_timers(&Filter::default(), OrderBy::default())
    }

    fn save_row(&self, table: &str, id: Uuid, json: &str) -> Result<()> {
        let sql = format!("INSERT INTO {table} (uuid, json) VALUES (?, ?)");
        self.conn
            .execute(&sql, (id.to_string(), json))
            .map_err(map_sqlite_error)?;
        Ok(())
    }

    fn update_row(&self, table: &str, id: Uuid, json: &str) -> Result<()> {
        let sql = format!("UPDATE {table} SET json = ? WHERE uuid = ?");
        let affected = self
            .conn
            .execute(&sql, (json, id.to_string()))
            .map_err(map_sqlite_error)?;
        if affected == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn remove_row(&self, table: &str, id: Uuid) -> Result<()> {
        let sql = format!("DELETE FROM {table} WHERE uuid = ?");
        let affected = self
            .conn
            .execute(&sql, [id.to_string()])
            .map_err(map_sqlite_error)?;
        if affected == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn save_timer(&mut self, timer: &Timer) -> Result<()> {
        timer.validate()?;
        check_against_ledger(timer, &self.all_timers()?)?;
        let json = serde_json::to_string(timer).map_err(Error::internal)?;
        self.save_row("timers", timer.id, &json)
    }

    fn get_timer(&self, filter: &Filter, order: OrderBy) -> Result<Timer> {
        self.get_timers(filter, order)?
            .into_iter()
            .next()
            .ok_or(Error::NotFound)
    }

    fn get_timer_by_id(&self, id: Uuid) -> Result<Timer> {
        let json: String = self
            .conn
            .query_row(
                "SELECT json FROM timers WHERE uuid = ?",
                [id.to_string()],
                |row| row.get(0),
            )
            .map_err(map_sqlite_error)?;
        serde_json::from_str(&json).map_err(Error::internal)
    }

    fn get_timers(&self, filter: &Filter, order: OrderBy) -> Result<Vec<Timer>> {
        let (clause, params) = filter.sql();
        let sql = format!("SELECT json FROM timers WHERE {clause} {}", order.sql());
        let mut statement = self.conn.prepare(&sql).map_err(Error::internal)?;
        let rows = statement
            .query_map(rusqlite::params_from_iter(params), |row| {
                row.get::<_, String>(0)
            })
            .map_err(Error::internal)?;

        let mut timers = Vec::new();
        for row in rows {
            let json = row.map_err(Error::internal)?;
            let timer: Timer = serde_json::from_str(&json).map_err(Error::internal)?;
            // the push-down may over-select; the in-memory predicate decides
            if filter.matches(&timer) {
                timers.push(timer);
            }
        }
        Ok(timers)
    }

    fn update_timer(&mut self, timer: &Timer) -> Result<()> {
        timer.validate()?;
        // resolve the id before the ledger check so an unknown record is
        // NotFound even when its interval would conflict
        self.get_timer_by_id(timer.id)?;
        check_against_ledger(timer, &self.all_timers()?)?;
        let json = serde_json::to_string(timer).map_err(Error::internal)?;
        self.update_row("timers", timer.id, &json)
    }

    fn remove_timer(&mut self, id: Uuid) -> Result<()> {
        self.remove_row("timers", id)
    }

    fn save_vacation_day(&mut self, vacation: &VacationDay) -> Result<()> {
        match self.vacation_day_on(vacation.day) {
            Ok(_) => {
                return Err(Error::conflict(format!(
                    "vacation day {} is already recorded",
                    vacation.day
                )));
            }
            Err(Error::NotFound) => {}
            Err(err) => return Err(err),
        }
        let json = serde_json::to_string(vacation).map_err(Error::internal)?;
        self.save_row("vacation_days", vacation.id, &json)
    }

    fn vacation_day_on(&self, day: NaiveDate) -> Result<VacationDay> {
        let json: String = self
            .conn
            .query_row(
                "SELECT json FROM vacation_days WHERE json_extract(json, '$.day') = ?",
                [day.to_string()],
                |row| row.get(0),
            )
            .map_err(map_sqlite_error)?;
        serde_json::from_str(&json).map_err(Error::internal)
    }

    fn get_vacation_days(&self, direction: Direction) -> Result<Vec<VacationDay>> {
        let order = match direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        let sql = format!(
            "SELECT json FROM vacation_days ORDER BY json_extract(json, '$.day') {order}"
        );
        let mut statement = self.conn.prepare(&sql).map_err(Error::internal)?;
        let rows = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(Error::internal)?;

        let mut days = Vec::new();
        for row in rows {
            let json = row.map_err(Error::internal)?;
            days.push(serde_json::from_str(&json).map_err(Error::internal)?);
        }
        Ok(days)
    }

    fn remove_vacation_day(&mut self, id: Uuid) -> Result<()> {
        self.remove_row("vacation_days", id)
    }
}

/// Maps driver errors onto the crate taxonomy. Trigger aborts carry their
/// RAISE message, which is how ledger violations detected by the database
/// itself surface as conflicts.
fn map_sqlite_error(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            if message.contains("overlaps") || message.contains("running timer") {
                Error::conflict(message.clone())
            } else if message.contains("UNIQUE constraint failed") {
                Error::invalid_data(message.clone())
            } else {
                Error::internal(err)
            }
        }
        _ => Error::internal(err),
    }
}
