//! List command: print timers matching a filter.

use anyhow::{Context, Result};
use tt_core::{Filter, OrderBy};
use tt_db::Storage;

pub fn run(storage: &dyn Storage, filter: Option<&str>, order: OrderBy, json: bool) -> Result<()> {
    let filter: Filter = filter.unwrap_or_default().parse()?;
    let timers = storage
        .get_timers(&filter, order)
        .context("failed to list timers")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&timers)?);
        return Ok(());
    }
    for (index, timer) in timers.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{timer}");
    }
    Ok(())
}
