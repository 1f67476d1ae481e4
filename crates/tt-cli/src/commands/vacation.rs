//! Vacation commands: manage the vacation calendar.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tt_core::{Direction, Error, VacationDay};
use tt_db::Storage;
use uuid::Uuid;

pub fn add(storage: &mut dyn Storage, day: NaiveDate, half: bool) -> Result<()> {
    match storage.vacation_day_on(day) {
        Ok(_) => anyhow::bail!("vacation day {day} is already recorded"),
        Err(Error::NotFound) => {}
        Err(err) => return Err(err.into()),
    }

    let vacation = VacationDay::new(day, half);
    storage
        .save_vacation_day(&vacation)
        .context("failed to record vacation day")?;
    println!("{vacation}");
    Ok(())
}

pub fn list(storage: &dyn Storage) -> Result<()> {
    let days = storage
        .get_vacation_days(Direction::Ascending)
        .context("failed to list vacation days")?;
    for (index, vacation) in days.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{vacation}");
    }
    Ok(())
}

pub fn remove(storage: &mut dyn Storage, id: Uuid) -> Result<()> {
    storage
        .remove_vacation_day(id)
        .context("failed to remove vacation day")?;
    println!("removed {id}");
    Ok(())
}
