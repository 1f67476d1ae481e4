//! Resume command: start a new timer continuing the most recent one.

use anyhow::{Context, Result};
use chrono::Utc;
use tt_core::{Filter, OrderBy, Timer, truncate_to_seconds};
use tt_db::Storage;

pub fn run(storage: &mut dyn Storage) -> Result<()> {
    let last = storage
        .get_timer(&Filter::default(), OrderBy::latest_start())
        .context("nothing to resume")?;
    anyhow::ensure!(!last.is_running(), "a timer is already running");

    let timer = Timer::new(
        last.project,
        last.task,
        last.tags,
        truncate_to_seconds(Utc::now()),
    )?;
    storage.save_timer(&timer).context("failed to resume timer")?;
    tracing::debug!(id = %timer.id, "timer resumed");

    println!("{timer}");
    Ok(())
}
