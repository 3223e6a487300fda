use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::duty::{resolve_duty, DutyCheck};
use crate::error::{PlantError, Result};
use crate::notify::{Notifier, TaskNotice};
use crate::rotation::ZoneRotator;
use crate::store::{Entity, Page, PageResult, Store};
use crate::types::{Plant, Task};

// ---------------------------------------------------------------------------
// ScheduleReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The plant is not placed in any zone.
    Unassigned,
    /// Neither duty is due today.
    NotDue,
    /// Pending tasks from today already cover every due duty.
    Duplicate,
    /// The plant's zone has nobody on its roster.
    EmptyRoster,
    /// The plant points at a zone that no longer exists.
    ZoneNotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPlant {
    pub plant_uuid: Uuid,
    pub plant_name: String,
    pub reason: SkipReason,
}

/// Outcome of one schedule run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub date: NaiveDate,
    pub created: Vec<Task>,
    pub skipped: Vec<SkippedPlant>,
}

impl ScheduleReport {
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

// ---------------------------------------------------------------------------
// Schedule generation
// ---------------------------------------------------------------------------

/// Create and announce a task for every plant due on `today`.
///
/// Plants are visited in name order. Store and messaging failures stop the
/// run; tasks written before the failure stay written.
pub fn create_schedule(
    store: &Store,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> Result<ScheduleReport> {
    let mut plants = store.list_all::<Plant>()?;
    plants.sort_by(|a, b| a.name.cmp(&b.name).then(a.uuid.cmp(&b.uuid)));

    let mut rotator = ZoneRotator::new(store);
    let mut report = ScheduleReport {
        date: today,
        created: Vec::new(),
        skipped: Vec::new(),
    };

    for plant in &plants {
        let skip = |reason| SkippedPlant {
            plant_uuid: plant.uuid,
            plant_name: plant.name.clone(),
            reason,
        };

        let Some(zone_uuid) = plant.zone_uuid else {
            tracing::debug!(plant = %plant.name, "not in a zone, skipping");
            report.skipped.push(skip(SkipReason::Unassigned));
            continue;
        };

        let due = resolve_duty(
            plant.last_time_watered,
            plant.last_time_sunlit,
            plant.water_requirement_days,
            plant.sun_requirement_days,
            today,
        );
        if !due.any() {
            tracing::debug!(plant = %plant.name, "nothing due");
            report.skipped.push(skip(SkipReason::NotDue));
            continue;
        }

        let remaining = due.without(pending_duties(store, plant, today)?);
        if !remaining.any() {
            tracing::debug!(plant = %plant.name, "already scheduled today");
            report.skipped.push(skip(SkipReason::Duplicate));
            continue;
        }

        let employee = match rotator.next_employee(&zone_uuid) {
            Ok(employee) => employee,
            Err(PlantError::EmptyRoster(zone)) => {
                tracing::warn!(plant = %plant.name, zone = %zone, "zone roster is empty, skipping");
                report.skipped.push(skip(SkipReason::EmptyRoster));
                continue;
            }
            Err(PlantError::ZoneNotFound(zone)) => {
                tracing::warn!(plant = %plant.name, zone = %zone, "zone does not exist, skipping");
                report.skipped.push(skip(SkipReason::ZoneNotFound));
                continue;
            }
            Err(e) => return Err(e),
        };

        let task = Task::new(plant.uuid, employee, remaining, today);
        store.put(&task)?;
        notifier.post_task(&TaskNotice::new(&task, plant))?;
        tracing::debug!(
            plant = %plant.name,
            employee = %task.employee_name,
            task = %task.uuid,
            "task created"
        );
        report.created.push(task);
    }

    tracing::info!(
        date = %today,
        created = report.created.len(),
        skipped = report.skipped.len(),
        "schedule run finished"
    );
    Ok(report)
}

/// Duties already covered by unresolved tasks created for `plant` on `today`.
fn pending_duties(store: &Store, plant: &Plant, today: NaiveDate) -> Result<DutyCheck> {
    let tasks: Vec<Task> = store.query_secondary_as(&plant.key().pk)?;
    Ok(tasks
        .iter()
        .filter(|t| !t.resolved && t.date == today)
        .fold(DutyCheck::default(), |acc, t| DutyCheck {
            water: acc.water || t.is_water,
            sun: acc.sun || t.is_sun,
        }))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Every unresolved task, oldest first.
pub fn get_schedule(store: &Store) -> Result<Vec<Task>> {
    let mut tasks: Vec<Task> = store
        .list_all::<Task>()?
        .into_iter()
        .filter(|t| !t.resolved)
        .collect();
    tasks.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.employee_name.cmp(&b.employee_name))
            .then(a.uuid.cmp(&b.uuid))
    });
    Ok(tasks)
}

/// One page of all tasks, resolved or not.
pub fn list_tasks(store: &Store, page: &Page) -> Result<PageResult<Task>> {
    store.list::<Task>(page)
}
