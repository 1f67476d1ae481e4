//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use chrono::NaiveDate;
use tt_core::Field;
use uuid::Uuid;

/// Personal time tracker.
///
/// Records work as timers against projects and tasks and reports worked
/// time against a configured weekly schedule.
#[derive(Debug, Parser)]
#[command(name = "tt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new timer.
    Start {
        /// Project the work belongs to.
        project: String,

        /// Optional task within the project.
        task: Option<String>,

        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Start at this time instead of now (RFC 3339, "HH:MM[:SS]" or
        /// "YYYY-MM-DD HH:MM[:SS]").
        #[arg(long)]
        at: Option<String>,
    },

    /// Stop the running timer.
    Stop {
        /// Stop at this time instead of now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Start a new timer continuing the most recent one.
    Resume,

    /// Show the running timer, if any.
    Status,

    /// List timers.
    List {
        /// Filter, e.g. "project=a,b;tags=x;since=2024-01-01".
        #[arg(short, long)]
        filter: Option<String>,

        /// Field to order by.
        #[arg(long, default_value = "start")]
        order: Field,

        /// Sort in descending order.
        #[arg(long)]
        desc: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report worked time against the schedule.
    Stats {
        /// Filter, e.g. "project=a,b;since=2024-01-01".
        #[arg(short, long)]
        filter: Option<String>,

        /// Break the report down by project.
        #[arg(long)]
        by_project: bool,

        /// Break each project down by task (implies --by-project).
        #[arg(long)]
        by_task: bool,

        /// Report each calendar day separately.
        #[arg(long)]
        daily: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of an existing timer.
    Edit {
        /// Id of the timer to edit.
        id: Uuid,

        /// New start time.
        #[arg(long)]
        start: Option<String>,

        /// New stop time.
        #[arg(long)]
        stop: Option<String>,

        /// New project name.
        #[arg(long)]
        project: Option<String>,

        /// New task; pass an empty string to clear it.
        #[arg(long)]
        task: Option<String>,

        /// New comma-separated tags; pass an empty string to clear them.
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Remove a timer.
    Remove {
        /// Id of the timer to remove.
        id: Uuid,
    },

    /// Manage vacation days.
    Vacation {
        #[command(subcommand)]
        action: VacationAction,
    },

    /// Export all timers.
    Export {
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: ExportFormat,
    },
}

/// Vacation calendar operations.
#[derive(Debug, Subcommand)]
pub enum VacationAction {
    /// Record a vacation day.
    Add {
        /// The day, as YYYY-MM-DD.
        day: NaiveDate,

        /// Record a half day.
        #[arg(long)]
        half: bool,
    },

    /// List recorded vacation days.
    List,

    /// Remove a vacation day.
    Remove {
        /// Id of the vacation day to remove.
        id: Uuid,
    },
}

/// Export output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}
