use crate::cmd::{split_names, Workspace};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plantcare_core::catalog::{self, ZoneUpdate};
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ZoneSubcommand {
    /// Create a zone with its rotation roster
    Add {
        name: String,
        /// Comma-separated employee names, in rotation order
        #[arg(long, default_value = "")]
        employees: String,
    },
    /// List all zones
    List,
    /// Show one zone
    Get { uuid: Uuid },
    /// Rename a zone or replace its roster
    Update {
        uuid: Uuid,
        #[arg(long)]
        name: Option<String>,
        /// Comma-separated employee names, in rotation order; replaces the roster
        #[arg(long)]
        employees: Option<String>,
    },
    /// Remove a zone; its plants become unassigned
    Delete { uuid: Uuid },
}

pub fn run(root: &Path, subcmd: ZoneSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(root)?;
    match subcmd {
        ZoneSubcommand::Add { name, employees } => {
            let zone = catalog::create_zone(&ws.store, &name, split_names(&employees))
                .context("failed to add zone")?;
            if zone.employees.is_empty() {
                tracing::warn!(zone = %zone.name, "zone has an empty roster; its plants will be skipped");
            }
            if json {
                print_json(&zone)?;
            } else {
                println!("Added zone '{}' [{}]", zone.name, zone.uuid);
            }
        }
        ZoneSubcommand::List => {
            let zones = catalog::list_zones(&ws.store)?;
            if json {
                print_json(&zones)?;
            } else if zones.is_empty() {
                println!("No zones.");
            } else {
                let rows = zones
                    .iter()
                    .map(|z| vec![z.uuid.to_string(), z.name.clone(), z.employees.join(", ")])
                    .collect();
                print_table(&["UUID", "NAME", "EMPLOYEES"], rows);
            }
        }
        ZoneSubcommand::Get { uuid } => {
            let zone = catalog::get_zone(&ws.store, &uuid)?;
            if json {
                print_json(&zone)?;
            } else {
                println!("Zone:      {}", zone.name);
                println!("UUID:      {}", zone.uuid);
                if zone.employees.is_empty() {
                    println!("Employees: (none)");
                } else {
                    println!("Employees:");
                    for (i, name) in zone.employees.iter().enumerate() {
                        println!("  {}. {name}", i + 1);
                    }
                }
            }
        }
        ZoneSubcommand::Update {
            uuid,
            name,
            employees,
        } => {
            let update = ZoneUpdate {
                name,
                employees: employees.as_deref().map(split_names),
            };
            let zone = catalog::update_zone(&ws.store, &uuid, update)
                .with_context(|| format!("failed to update zone {uuid}"))?;
            if json {
                print_json(&zone)?;
            } else {
                println!(
                    "Updated zone '{}' [{}]: {}",
                    zone.name,
                    zone.uuid,
                    zone.employees.join(", ")
                );
            }
        }
        ZoneSubcommand::Delete { uuid } => {
            let unassigned = catalog::delete_zone(&ws.store, &uuid)
                .with_context(|| format!("failed to delete zone {uuid}"))?;
            if json {
                print_json(&serde_json::json!({ "uuid": uuid, "unassigned": unassigned }))?;
            } else {
                println!("Deleted zone [{uuid}]");
                for plant in &unassigned {
                    println!("  unassigned: {}", plant.name);
                }
            }
        }
    }
    Ok(())
}
