//! Edit command: change fields of an existing timer.

use anyhow::{Context, Result};
use chrono::Utc;
use tt_core::truncate_to_seconds;
use tt_db::Storage;
use uuid::Uuid;

use super::util::parse_timestamp;

/// Field changes from the command line; absent fields are left untouched.
#[derive(Debug, Default)]
pub struct Changes {
    pub start: Option<String>,
    pub stop: Option<String>,
    pub project: Option<String>,
    pub task: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub fn run(storage: &mut dyn Storage, id: Uuid, changes: Changes) -> Result<()> {
    let mut timer = storage.get_timer_by_id(id).context("failed to load timer")?;
    let now = truncate_to_seconds(Utc::now());

    if let Some(raw) = changes.start {
        timer.start = parse_timestamp(&raw, now)?;
    }
    if let Some(raw) = changes.stop {
        timer.stop = Some(parse_timestamp(&raw, now)?);
    }
    if let Some(project) = changes.project {
        timer.project = project;
    }
    if let Some(task) = changes.task {
        // an empty string clears the task
        timer.task = (!task.is_empty()).then_some(task);
    }
    if let Some(tags) = changes.tags {
        timer.tags = tags.into_iter().filter(|tag| !tag.is_empty()).collect();
    }

    storage.update_timer(&timer).context("failed to edit timer")?;
    println!("{timer}");
    Ok(())
}
