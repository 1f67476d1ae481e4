//! Timer ledger CLI library.
//!
//! This crate provides the CLI interface for the timer ledger.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ExportFormat, VacationAction};
pub use config::{Backend, Config};
