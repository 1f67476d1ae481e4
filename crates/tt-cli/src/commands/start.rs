//! Start command: open a new timer.

use anyhow::{Context, Result};
use chrono::Utc;
use tt_core::{Timer, truncate_to_seconds};
use tt_db::Storage;

use super::util::parse_timestamp;

pub fn run(
    storage: &mut dyn Storage,
    project: String,
    task: Option<String>,
    tags: Vec<String>,
    at: Option<&str>,
) -> Result<()> {
    let now = truncate_to_seconds(Utc::now());
    let start = match at {
        Some(raw) => parse_timestamp(raw, now)?,
        None => now,
    };

    let timer = Timer::new(project, task, tags, start)?;
    storage.save_timer(&timer).context("failed to start timer")?;
    tracing::debug!(id = %timer.id, "timer started");

    println!("{timer}");
    Ok(())
}
