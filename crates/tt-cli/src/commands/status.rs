//! Status command: show the running timer.

use anyhow::Result;
use chrono::Utc;
use tt_core::{Error, Filter, OrderBy, Precision, format_duration};
use tt_db::Storage;

pub fn run(storage: &dyn Storage, precision: Precision) -> Result<()> {
    match storage.get_timer(&Filter::default(), OrderBy::latest_start()) {
        Ok(timer) if timer.is_running() => {
            println!("{timer}");
            println!(
                "Elapsed: {}",
                format_duration(timer.duration(Utc::now()), precision)
            );
        }
        Ok(_) | Err(Error::NotFound) => println!("no running timer"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
