//! Stop command: close the running timer.

use anyhow::{Context, Result};
use chrono::Utc;
use tt_core::{Filter, OrderBy, Precision, format_duration, truncate_to_seconds};
use tt_db::Storage;

use super::util::parse_timestamp;

pub fn run(storage: &mut dyn Storage, at: Option<&str>, precision: Precision) -> Result<()> {
    let mut timer = running_timer(storage)?;

    let now = truncate_to_seconds(Utc::now());
    let stop = match at {
        Some(raw) => parse_timestamp(raw, now)?,
        None => now,
    };
    timer.stop = Some(stop);
    storage.update_timer(&timer).context("failed to stop timer")?;

    println!(
        "Stopped {} after {}",
        timer.project,
        format_duration(timer.duration(now), precision)
    );
    Ok(())
}

/// The running timer, if the most recently started timer is still open.
fn running_timer(storage: &dyn Storage) -> Result<tt_core::Timer> {
    let timer = storage
        .get_timer(&Filter::default(), OrderBy::latest_start())
        .map_err(|err| {
            if err.is_not_found() {
                anyhow::anyhow!("no running timer")
            } else {
                err.into()
            }
        })?;
    anyhow::ensure!(timer.is_running(), "no running timer");
    Ok(timer)
}
