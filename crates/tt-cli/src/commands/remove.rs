//! Remove command: delete a timer.

use anyhow::{Context, Result};
use tt_db::Storage;
use uuid::Uuid;

pub fn run(storage: &mut dyn Storage, id: Uuid) -> Result<()> {
    storage.remove_timer(id).context("failed to remove timer")?;
    println!("removed {id}");
    Ok(())
}
