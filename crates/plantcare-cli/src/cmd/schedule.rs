use crate::cmd::{plant_names, task_row, Workspace, TASK_HEADERS};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plantcare_core::duty::utc_today;
use plantcare_core::schedule::{self, SkipReason};
use std::path::Path;

#[derive(Subcommand)]
pub enum ScheduleSubcommand {
    /// Create and announce today's tasks for every due plant
    Run,
    /// Show every pending task
    Show,
}

pub fn run(root: &Path, subcmd: ScheduleSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(root)?;
    match subcmd {
        ScheduleSubcommand::Run => {
            let notifier = ws.notifier();
            let report = schedule::create_schedule(&ws.store, notifier.as_ref(), utc_today())
                .context("schedule run failed")?;
            if json {
                return print_json(&report);
            }

            println!(
                "Schedule for {}: {} task(s) created",
                report.date,
                report.created.len()
            );
            if !report.created.is_empty() {
                let names = plant_names(&ws.store)?;
                let rows = report.created.iter().map(|t| task_row(t, &names)).collect();
                print_table(&TASK_HEADERS, rows);
            }
            for skipped in &report.skipped {
                if matches!(skipped.reason, SkipReason::NotDue | SkipReason::Unassigned) {
                    continue;
                }
                println!("  skipped {}: {}", skipped.plant_name, reason_text(skipped.reason));
            }
        }
        ScheduleSubcommand::Show => {
            let tasks = schedule::get_schedule(&ws.store)?;
            if json {
                return print_json(&serde_json::json!({ "tasks": tasks }));
            }
            if tasks.is_empty() {
                println!("No pending tasks.");
                return Ok(());
            }
            let names = plant_names(&ws.store)?;
            let rows = tasks.iter().map(|t| task_row(t, &names)).collect();
            print_table(&TASK_HEADERS, rows);
        }
    }
    Ok(())
}

fn reason_text(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Unassigned => "not in a zone",
        SkipReason::NotDue => "nothing due",
        SkipReason::Duplicate => "already scheduled today",
        SkipReason::EmptyRoster => "zone has no employees",
        SkipReason::ZoneNotFound => "zone no longer exists",
    }
}
