pub mod config;
pub mod init;
pub mod plant;
pub mod schedule;
pub mod scoreboard;
pub mod serve;
pub mod task;
pub mod zone;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use plantcare_core::config::Config;
use plantcare_core::notify::{notifier_from_config, Notifier};
use plantcare_core::store::Store;
use plantcare_core::types::Task;
use plantcare_core::{catalog, paths, PlantError};
use uuid::Uuid;

/// Effective config plus the opened store for an initialized workspace.
pub struct Workspace {
    pub config: Config,
    pub store: Store,
}

impl Workspace {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        if !paths::plantcare_dir(root).is_dir() {
            return Err(PlantError::NotInitialized.into());
        }
        let config = Config::load_effective(root).context("failed to load config")?;
        let db_path = config.db_path_in(root);
        let store = Store::open(&db_path)
            .with_context(|| format!("failed to open store at {}", db_path.display()))?;
        Ok(Self { config, store })
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        notifier_from_config(&self.config)
    }
}

/// Plant names keyed by uuid, for labelling task rows.
pub fn plant_names(store: &Store) -> anyhow::Result<HashMap<Uuid, String>> {
    Ok(catalog::list_plants(store)?
        .into_iter()
        .map(|p| (p.uuid, p.name))
        .collect())
}

pub fn task_row(task: &Task, names: &HashMap<Uuid, String>) -> Vec<String> {
    vec![
        task.uuid.to_string(),
        names
            .get(&task.plant_uuid)
            .cloned()
            .unwrap_or_else(|| task.plant_uuid.to_string()),
        task.employee_name.clone(),
        task.duties().label(),
        task.date.to_string(),
        task.status().to_string(),
    ]
}

pub const TASK_HEADERS: [&str; 6] = ["UUID", "PLANT", "EMPLOYEE", "DUTIES", "DATE", "STATUS"];

/// Split `a, b,c` style lists, dropping blanks.
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
