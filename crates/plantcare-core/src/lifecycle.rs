//! Task lifecycle: `Pending(E) --complete--> Resolved`, `Pending(E) --delegate--> Pending(E')`.
//!
//! Both transitions are optimistic: the task is re-read on a version
//! conflict, so of two racing completions exactly one applies its side
//! effects and the other sees [`Completion::AlreadyCompleted`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlantError, Result};
use crate::store::{Store, Versioned, Write};
use crate::types::{Plant, Task};

pub(crate) const MAX_CONFLICT_RETRIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    Completed {
        task: Task,
        /// `None` when the plant was deleted after the task was created.
        plant: Option<Plant>,
    },
    /// The task was resolved before this call; nothing was changed.
    #[serde(rename = "task_already_completed")]
    AlreadyCompleted { task: Task },
}

impl Completion {
    pub fn task(&self) -> &Task {
        match self {
            Completion::Completed { task, .. } | Completion::AlreadyCompleted { task } => task,
        }
    }
}

fn load_task(store: &Store, uuid: &Uuid) -> Result<Versioned<Task>> {
    store
        .get::<Task>(uuid)?
        .ok_or_else(|| PlantError::TaskNotFound(uuid.to_string()))
}

/// Resolve a pending task and move its plant's serviced dates to `today`.
///
/// The task and plant are written in one transaction.
pub fn complete_task(
    store: &Store,
    uuid: &Uuid,
    additional_info: Option<String>,
    today: NaiveDate,
) -> Result<Completion> {
    let note = additional_info
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    for _ in 0..MAX_CONFLICT_RETRIES {
        let current = load_task(store, uuid)?;
        if current.value.resolved {
            tracing::info!(task = %uuid, "task already completed");
            return Ok(Completion::AlreadyCompleted {
                task: current.value,
            });
        }

        let mut task = current.value;
        task.resolved = true;
        task.completed_on = Some(today);
        task.additional_info = note.clone();

        let mut writes = vec![Write::put_if_version(&task, current.version)?];
        let plant = match store.get::<Plant>(&task.plant_uuid)? {
            Some(Versioned { mut value, version }) => {
                value.record_service(task.is_water, task.is_sun, today);
                writes.push(Write::put_if_version(&value, version)?);
                Some(value)
            }
            None => {
                tracing::warn!(
                    task = %task.uuid,
                    plant = %task.plant_uuid,
                    "plant no longer exists, resolving task only"
                );
                None
            }
        };

        match store.transact(writes) {
            Ok(_) => {
                tracing::info!(
                    task = %task.uuid,
                    employee = %task.employee_name,
                    "task completed"
                );
                return Ok(Completion::Completed { task, plant });
            }
            Err(PlantError::VersionConflict(key)) => {
                tracing::debug!(task = %uuid, %key, "concurrent write, re-reading");
            }
            Err(e) => return Err(e),
        }
    }
    Err(PlantError::VersionConflict(uuid.to_string()))
}

/// Reassign a pending task to `new_employee`.
pub fn delegate_task(store: &Store, uuid: &Uuid, new_employee: &str) -> Result<Task> {
    let new_employee = new_employee.trim();
    if new_employee.is_empty() {
        return Err(PlantError::InvalidPayload(
            "employee name must not be empty".into(),
        ));
    }

    for _ in 0..MAX_CONFLICT_RETRIES {
        let current = load_task(store, uuid)?;
        if current.value.resolved {
            return Err(PlantError::TaskAlreadyResolved(uuid.to_string()));
        }
        if current.value.employee_name == new_employee {
            return Ok(current.value);
        }

        let mut task = current.value;
        let previous = std::mem::replace(&mut task.employee_name, new_employee.to_string());
        match store.put_if_version(&task, current.version) {
            Ok(_) => {
                tracing::info!(task = %uuid, from = %previous, to = %new_employee, "task delegated");
                return Ok(task);
            }
            Err(PlantError::VersionConflict(_)) => {
                tracing::debug!(task = %uuid, "concurrent write, re-reading");
            }
            Err(e) => return Err(e),
        }
    }
    Err(PlantError::VersionConflict(uuid.to_string()))
}
