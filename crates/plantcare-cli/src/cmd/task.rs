use crate::cmd::{plant_names, task_row, Workspace, TASK_HEADERS};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plantcare_core::duty::utc_today;
use plantcare_core::lifecycle::{self, Completion};
use plantcare_core::notify::TaskNotice;
use plantcare_core::schedule;
use plantcare_core::store::{Page, DEFAULT_PAGE_SIZE};
use plantcare_core::types::Plant;
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// List tasks one page at a time
    List {
        /// Page size (clamped to 10..=100)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// Cursor printed by the previous page
        #[arg(long)]
        start_key: Option<String>,
    },
    /// Mark a task done and record the service on its plant
    Complete {
        uuid: Uuid,
        /// Note stored on the task
        #[arg(long)]
        info: Option<String>,
    },
    /// Reassign a pending task and announce it again
    Delegate {
        uuid: Uuid,
        /// Employee who takes the task over
        #[arg(long = "to")]
        employee: String,
    },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(root)?;
    match subcmd {
        TaskSubcommand::List {
            page_size,
            start_key,
        } => list(&ws, page_size, start_key, json),
        TaskSubcommand::Complete { uuid, info } => complete(&ws, &uuid, info, json),
        TaskSubcommand::Delegate { uuid, employee } => delegate(&ws, &uuid, &employee, json),
    }
}

fn list(
    ws: &Workspace,
    page_size: usize,
    start_key: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let page = Page {
        page_size: Some(page_size),
        start_key,
    };
    let result = schedule::list_tasks(&ws.store, &page)?;
    if json {
        return print_json(&result);
    }

    if result.items.is_empty() {
        println!("No tasks.");
    } else {
        let names = plant_names(&ws.store)?;
        let rows = result.items.iter().map(|t| task_row(t, &names)).collect();
        print_table(&TASK_HEADERS, rows);
    }
    if let Some(next) = &result.last_key {
        println!("\nMore tasks: --start-key {next}");
    }
    Ok(())
}

fn complete(ws: &Workspace, uuid: &Uuid, info: Option<String>, json: bool) -> anyhow::Result<()> {
    let completion = lifecycle::complete_task(&ws.store, uuid, info, utc_today())
        .with_context(|| format!("failed to complete task {uuid}"))?;
    if json {
        return print_json(&completion);
    }
    match completion {
        Completion::Completed { task, .. } => {
            println!("Completed task [{}] ({})", task.uuid, task.duties().label())
        }
        Completion::AlreadyCompleted { task } => {
            println!("Task [{}] was already completed", task.uuid)
        }
    }
    Ok(())
}

fn delegate(ws: &Workspace, uuid: &Uuid, employee: &str, json: bool) -> anyhow::Result<()> {
    let task = lifecycle::delegate_task(&ws.store, uuid, employee)
        .with_context(|| format!("failed to delegate task {uuid}"))?;
    match ws.store.get::<Plant>(&task.plant_uuid)? {
        Some(plant) => {
            ws.notifier()
                .post_task(&TaskNotice::new(&task, &plant.value))
                .context("task was delegated but the announcement failed")?;
        }
        None => tracing::warn!(task = %task.uuid, "plant is gone; delegation not announced"),
    }

    if json {
        print_json(&task)?;
    } else {
        println!("Task [{}] is now assigned to {}", task.uuid, task.employee_name);
    }
    Ok(())
}
