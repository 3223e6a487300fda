use crate::cmd::Workspace;
use crate::output::{print_json, print_table};
use anyhow::Context;
use plantcare_core::scoreboard;
use std::path::Path;

pub fn run(root: &Path, post: bool, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(root)?;
    let entries = scoreboard::scoreboard(&ws.store)?;

    if post {
        ws.notifier()
            .post_scoreboard(&entries)
            .context("failed to post scoreboard")?;
    }

    if json {
        return print_json(&serde_json::json!({ "scoreboard": entries }));
    }
    if entries.is_empty() {
        println!("No tasks completed yet.");
    } else {
        let rows = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                vec![
                    (i + 1).to_string(),
                    e.employee_name.clone(),
                    e.completed.to_string(),
                ]
            })
            .collect();
        print_table(&["#", "EMPLOYEE", "COMPLETED"], rows);
    }
    if post {
        println!("\nScoreboard posted.");
    }
    Ok(())
}

pub fn employees(root: &Path, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(root)?;
    let names = scoreboard::employee_names(&ws.store)?;
    if json {
        print_json(&serde_json::json!({ "employees": names }))?;
    } else if names.is_empty() {
        println!("No employees.");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
