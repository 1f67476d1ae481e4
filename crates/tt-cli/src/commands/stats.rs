//! Stats command: report worked time against the schedule.

use anyhow::{Context, Result};
use tt_core::{
    Filter, OrderBy, Precision, Statistic, WorkSchedule, aggregate, aggregate_by_day,
    format_duration,
};
use tt_db::{Storage, vacation_map};

/// Report options from the command line.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub by_project: bool,
    pub by_task: bool,
    pub daily: bool,
    pub json: bool,
}

pub fn run(
    storage: &dyn Storage,
    filter: Option<&str>,
    schedule: &WorkSchedule,
    precision: Precision,
    options: Options,
) -> Result<()> {
    let filter: Filter = filter.unwrap_or_default().parse()?;
    let timers = storage
        .get_timers(&filter, OrderBy::default())
        .context("failed to load timers")?;
    let vacations = vacation_map(storage).context("failed to load vacation days")?;
    let by_project = options.by_project || options.by_task;

    if options.daily {
        let by_day = aggregate_by_day(&timers, schedule, &vacations, by_project, options.by_task);
        if options.json {
            println!("{}", serde_json::to_string_pretty(&by_day)?);
            return Ok(());
        }
        for (index, (day, statistic)) in by_day.iter().enumerate() {
            if index > 0 {
                println!();
            }
            println!("{day}");
            print_statistic(statistic, precision);
        }
        return Ok(());
    }

    let statistic = aggregate(&timers, schedule, &vacations, by_project, options.by_task);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&statistic)?);
        return Ok(());
    }
    print_statistic(&statistic, precision);
    Ok(())
}

fn print_statistic(statistic: &Statistic, precision: Precision) {
    println!("Worked    : {}", format_duration(statistic.worked, precision));
    println!("Planned   : {}", format_duration(statistic.planned, precision));
    println!(
        "Difference: {}",
        format_duration(statistic.difference, precision)
    );
    println!("Percentage: {:.1}%", statistic.percentage * 100.0);
    for project in &statistic.by_projects {
        println!(
            "  {}: {}",
            project.name,
            format_duration(project.worked, precision)
        );
        for task in &project.by_tasks {
            println!(
                "    {}: {}",
                task.name,
                format_duration(task.worked, precision)
            );
        }
    }
}
