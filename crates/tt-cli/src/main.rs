use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tt_cli::commands::{
    edit, export, list, remove, resume, start, stats, status, stop, vacation,
};
use tt_cli::{Backend, Cli, Commands, Config, VacationAction};
use tt_core::{Direction, OrderBy};
use tt_db::{FileStorage, SqliteStorage, Storage};

/// Load config and open storage, ensuring the parent directory exists.
fn open_storage(config_path: Option<&Path>) -> Result<(Box<dyn Storage>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path = config.storage_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create storage directory")?;
    }

    let storage: Box<dyn Storage> = match config.backend {
        Backend::Sqlite => {
            Box::new(SqliteStorage::open(&path).context("failed to open database")?)
        }
        Backend::File => {
            Box::new(FileStorage::open(&path).context("failed to open storage file")?)
        }
    };
    Ok((storage, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let Some(command) = cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut storage, config) = open_storage(cli.config.as_deref())?;
    match command {
        Commands::Start {
            project,
            task,
            tags,
            at,
        } => start::run(storage.as_mut(), project, task, tags, at.as_deref())?,
        Commands::Stop { at } => {
            stop::run(storage.as_mut(), at.as_deref(), config.precision)?;
        }
        Commands::Resume => resume::run(storage.as_mut())?,
        Commands::Status => status::run(storage.as_ref(), config.precision)?,
        Commands::List {
            filter,
            order,
            desc,
            json,
        } => {
            let direction = if desc {
                Direction::Descending
            } else {
                Direction::Ascending
            };
            list::run(
                storage.as_ref(),
                filter.as_deref(),
                OrderBy::new(order, direction),
                json,
            )?;
        }
        Commands::Stats {
            filter,
            by_project,
            by_task,
            daily,
            json,
        } => stats::run(
            storage.as_ref(),
            filter.as_deref(),
            &config.schedule(),
            config.precision,
            stats::Options {
                by_project,
                by_task,
                daily,
                json,
            },
        )?,
        Commands::Edit {
            id,
            start,
            stop,
            project,
            task,
            tags,
        } => edit::run(
            storage.as_mut(),
            id,
            edit::Changes {
                start,
                stop,
                project,
                task,
                tags,
            },
        )?,
        Commands::Remove { id } => remove::run(storage.as_mut(), id)?,
        Commands::Vacation { action } => match action {
            VacationAction::Add { day, half } => vacation::add(storage.as_mut(), day, half)?,
            VacationAction::List => vacation::list(storage.as_ref())?,
            VacationAction::Remove { id } => vacation::remove(storage.as_mut(), id)?,
        },
        Commands::Export { format } => export::run(storage.as_ref(), format)?,
    }

    Ok(())
}
