//! Export command: dump all timers to stdout.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use tt_core::{Filter, OrderBy};
use tt_db::Storage;

use crate::ExportFormat;

pub fn run(storage: &dyn Storage, format: ExportFormat) -> Result<()> {
    let timers = storage
        .get_timers(&Filter::default(), OrderBy::default())
        .context("failed to load timers")?;

    match format {
        ExportFormat::Json => println!("{}", serde_json::to_string_pretty(&timers)?),
        ExportFormat::Csv => {
            println!("id,start,stop,project,task,tags");
            for timer in &timers {
                let stop = timer
                    .stop
                    .map(|stop| stop.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_default();
                println!(
                    "{},{},{},{},{},{}",
                    timer.id,
                    timer.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    stop,
                    csv_field(&timer.project),
                    csv_field(timer.task.as_deref().unwrap_or("")),
                    csv_field(&timer.tags.join(";")),
                );
            }
        }
    }
    Ok(())
}

/// Quotes a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
