use crate::cmd::Workspace;
use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use plantcare_core::catalog::{self, NewPlant, PlantUpdate};
use plantcare_core::duty::utc_today;
use plantcare_core::types::Plant;
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum PlantSubcommand {
    /// Register a plant
    Add {
        name: String,
        /// Water every N days
        #[arg(long)]
        water_days: u32,
        /// Move to sun every N days
        #[arg(long)]
        sun_days: u32,
        /// Zone the plant lives in (omit to leave it unscheduled)
        #[arg(long)]
        zone: Option<Uuid>,
        /// Last watering date, YYYY-MM-DD (default: today)
        #[arg(long)]
        last_watered: Option<NaiveDate>,
        /// Last sun date, YYYY-MM-DD (default: today)
        #[arg(long)]
        last_sunlit: Option<NaiveDate>,
        /// Free-form care notes shown on every task message
        #[arg(long)]
        info: Option<String>,
    },
    /// List all plants
    List,
    /// Show one plant
    Get { uuid: Uuid },
    /// Move a plant into a zone, or out of every zone with --none
    Assign {
        uuid: Uuid,
        #[arg(long, conflicts_with = "none", required_unless_present = "none")]
        zone: Option<Uuid>,
        #[arg(long)]
        none: bool,
    },
    /// Change a plant's name, care intervals or notes
    Update {
        uuid: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        water_days: Option<u32>,
        #[arg(long)]
        sun_days: Option<u32>,
        /// New notes; an empty string clears them
        #[arg(long)]
        info: Option<String>,
    },
    /// Remove a plant
    Delete { uuid: Uuid },
}

pub fn run(root: &Path, subcmd: PlantSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(root)?;
    match subcmd {
        PlantSubcommand::Add {
            name,
            water_days,
            sun_days,
            zone,
            last_watered,
            last_sunlit,
            info,
        } => {
            let new = NewPlant {
                name,
                zone_uuid: zone,
                water_requirement_days: water_days,
                sun_requirement_days: sun_days,
                last_time_watered: last_watered,
                last_time_sunlit: last_sunlit,
                additional_info: info,
            };
            let plant = catalog::create_plant(&ws.store, new, utc_today())
                .context("failed to add plant")?;
            if json {
                print_json(&plant)?;
            } else {
                println!("Added plant '{}' [{}]", plant.name, plant.uuid);
            }
        }
        PlantSubcommand::List => {
            let plants = catalog::list_plants(&ws.store)?;
            if json {
                print_json(&plants)?;
            } else if plants.is_empty() {
                println!("No plants.");
            } else {
                let rows = plants.iter().map(row).collect();
                print_table(
                    &["UUID", "NAME", "ZONE", "WATER", "SUN", "WATERED", "SUNLIT"],
                    rows,
                );
            }
        }
        PlantSubcommand::Get { uuid } => {
            let plant = catalog::get_plant(&ws.store, &uuid)?;
            if json {
                print_json(&plant)?;
            } else {
                show(&plant);
            }
        }
        PlantSubcommand::Assign { uuid, zone, none: _ } => {
            let plant = catalog::assign_plant(&ws.store, &uuid, zone)
                .with_context(|| format!("failed to assign plant {uuid}"))?;
            if json {
                print_json(&plant)?;
            } else {
                match plant.zone_uuid {
                    Some(zone) => println!("Plant '{}' moved to zone {zone}", plant.name),
                    None => println!("Plant '{}' removed from its zone", plant.name),
                }
            }
        }
        PlantSubcommand::Update {
            uuid,
            name,
            water_days,
            sun_days,
            info,
        } => {
            let update = PlantUpdate {
                name,
                water_requirement_days: water_days,
                sun_requirement_days: sun_days,
                additional_info: info,
            };
            let plant = catalog::update_plant(&ws.store, &uuid, update)
                .with_context(|| format!("failed to update plant {uuid}"))?;
            if json {
                print_json(&plant)?;
            } else {
                println!("Updated plant '{}' [{}]", plant.name, plant.uuid);
            }
        }
        PlantSubcommand::Delete { uuid } => {
            catalog::delete_plant(&ws.store, &uuid)
                .with_context(|| format!("failed to delete plant {uuid}"))?;
            if json {
                print_json(&serde_json::json!({ "uuid": uuid, "deleted": true }))?;
            } else {
                println!("Deleted plant [{uuid}]");
            }
        }
    }
    Ok(())
}

fn row(plant: &Plant) -> Vec<String> {
    vec![
        plant.uuid.to_string(),
        plant.name.clone(),
        plant
            .zone_uuid
            .map(|z| z.to_string())
            .unwrap_or_else(|| "-".to_string()),
        format!("{}d", plant.water_requirement_days),
        format!("{}d", plant.sun_requirement_days),
        plant.last_time_watered.to_string(),
        plant.last_time_sunlit.to_string(),
    ]
}

fn show(plant: &Plant) {
    println!("Plant:    {}", plant.name);
    println!("UUID:     {}", plant.uuid);
    match plant.zone_uuid {
        Some(zone) => println!("Zone:     {zone}"),
        None => println!("Zone:     (unassigned)"),
    }
    println!(
        "Water:    every {}d, last {}",
        plant.water_requirement_days, plant.last_time_watered
    );
    println!(
        "Sun:      every {}d, last {}",
        plant.sun_requirement_days, plant.last_time_sunlit
    );
    if let Some(info) = &plant.additional_info {
        println!("Notes:    {info}");
    }
}
