//! Flat-file backend: the whole ledger in one JSON document.

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tt_core::{
    Direction, Error, Filter, OrderBy, Result, Timer, VacationDay, check_against_ledger,
};
use uuid::Uuid;

use crate::Storage;

/// The serialized document written to disk.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    timers: Vec<Timer>,
    #[serde(default)]
    vacation_days: Vec<VacationDay>,
}

/// Flat-list backend holding all records in memory.
///
/// Every mutation rewrites the whole backing file (write to a sibling temp
/// file, then rename), so a failed write leaves the previous file intact.
/// There is no cross-process safety; see the module docs.
pub struct FileStorage {
    path: PathBuf,
    timers: Vec<Timer>,
    vacation_days: Vec<VacationDay>,
}

impl FileStorage {
    /// Opens the document at `path`, starting empty if the file does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = match std::fs::read(&path) {
            Ok(bytes) => {
                serde_json::from_slice::<Document>(&bytes).map_err(Error::internal)?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Document::default(),
            Err(err) => return Err(Error::internal(err)),
        };
        tracing::debug!(
            path = %path.display(),
            timers = document.timers.len(),
            "opened file storage"
        );
        Ok(Self {
            path,
            timers: document.timers,
            vacation_days: document.vacation_days,
        })
    }

    fn write(&self) -> Result<()> {
        let document = Document {
            timers: self.timers.clone(),
            vacation_days: self.vacation_days.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&document).map_err(Error::internal)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes).map_err(Error::internal)?;
        std::fs::rename(&tmp, &self.path).map_err(Error::internal)
    }

    fn timer_index(&self, id: Uuid) -> Result<usize> {
        self.timers
            .iter()
            .position(|timer| timer.id == id)
            .ok_or(Error::NotFound)
    }
}

impl Storage for FileStorage {
    fn save_timer(&mut self, timer: &Timer) -> Result<()> {
        timer.validate()?;
        if self.timers.iter().any(|existing| existing.id == timer.id) {
            return Err(Error::invalid_data(format!(
                "timer {} already exists",
                timer.id
            )));
        }
        check_against_ledger(timer, &self.timers)?;
        self.timers.push(timer.clone());
        if let Err(err) = self.write() {
            self.timers.pop();
            return Err(err);
        }
        Ok(())
    }

    fn get_timer(&self, filter: &Filter, order: OrderBy) -> Result<Timer> {
        self.get_timers(filter, order)?
            .into_iter()
            .next()
            .ok_or(Error::NotFound)
    }

    fn get_timer_by_id(&self, id: Uuid) -> Result<Timer> {
        self.timer_index(id).map(|index| self.timers[index].clone())
    }

    fn get_timers(&self, filter: &Filter, order: OrderBy) -> Result<Vec<Timer>> {
        let mut matches: Vec<Timer> = self
            .timers
            .iter()
            .filter(|timer| filter.matches(timer))
            .cloned()
            .collect();
        matches.sort_by(|a, b| order.compare(a, b));
        Ok(matches)
    }

    fn update_timer(&mut self, timer: &Timer) -> Result<()> {
        timer.validate()?;
        let index = self.timer_index(timer.id)?;
        check_against_ledger(timer, &self.timers)?;
        let previous = std::mem::replace(&mut self.timers[index], timer.clone());
        if let Err(err) = self.write() {
            self.timers[index] = previous;
            return Err(err);
        }
        Ok(())
    }

    fn remove_timer(&mut self, id: Uuid) -> Result<()> {
        let index = self.timer_index(id)?;
        let removed = self.timers.remove(index);
        if let Err(err) = self.write() {
            self.timers.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }

    fn save_vacation_day(&mut self, vacation: &VacationDay) -> Result<()> {
        if self
            .vacation_days
            .iter()
            .any(|existing| existing.day == vacation.day)
        {
            return Err(Error::conflict(format!(
                "vacation day {} is already recorded",
                vacation.day
            )));
        }
        self.vacation_days.push(vacation.clone());
        if let Err(err) = self.write() {
            self.vacation_days.pop();
            return Err(err);
        }
        Ok(())
    }

    fn vacation_day_on(&self, day: NaiveDate) -> Result<VacationDay> {
        self.vacation_days
            .iter()
            .find(|vacation| vacation.day == day)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_vacation_days(&self, direction: Direction) -> Result<Vec<VacationDay>> {
        let mut days = self.vacation_days.clone();
        days.sort_by(|a, b| match direction {
            Direction::Ascending => a.day.cmp(&b.day),
            Direction::Descending => b.day.cmp(&a.day),
        });
        Ok(days)
    }

    fn remove_vacation_day(&mut self, id: Uuid) -> Result<()> {
        let index = self
            .vacation_days
            .iter()
            .position(|vacation| vacation.id == id)
            .ok_or(Error::NotFound)?;
        let removed = self.vacation_days.remove(index);
        if let Err(err) = self.write() {
            self.vacation_days.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }
}
