use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::duty::DutyCheck;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Discriminator stored on every item; the type index is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Plant,
    Zone,
    Task,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Plant => "PLANT",
            EntityType::Zone => "ZONE",
            EntityType::Task => "TASK",
        }
    }

    /// Partition key for the entity with the given identity.
    pub fn partition_key(self, uuid: &Uuid) -> String {
        format!("{}#{}", self.as_str(), uuid)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANT" => Ok(EntityType::Plant),
            "ZONE" => Ok(EntityType::Zone),
            "TASK" => Ok(EntityType::Task),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Plant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub uuid: Uuid,
    /// `None` means the plant is not placed in any zone and is never scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_uuid: Option<Uuid>,
    pub name: String,
    pub water_requirement_days: u32,
    pub sun_requirement_days: u32,
    pub last_time_watered: NaiveDate,
    pub last_time_sunlit: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Plant {
    /// Move the serviced dates forward for the duties a resolved task covered.
    /// Dates never go backwards.
    pub fn record_service(&mut self, is_water: bool, is_sun: bool, on: NaiveDate) {
        if is_water {
            self.last_time_watered = self.last_time_watered.max(on);
        }
        if is_sun {
            self.last_time_sunlit = self.last_time_sunlit.max(on);
        }
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub uuid: Uuid,
    pub name: String,
    /// Rotation order for duty assignment.
    #[serde(default)]
    pub employees: Vec<String>,
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Resolved,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Resolved => "resolved",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// One assigned care duty (a plant-care record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: Uuid,
    pub plant_uuid: Uuid,
    pub employee_name: String,
    pub is_water: bool,
    pub is_sun: bool,
    /// Creation date.
    pub date: NaiveDate,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Task {
    pub fn new(
        plant_uuid: Uuid,
        employee_name: impl Into<String>,
        duties: DutyCheck,
        date: NaiveDate,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            plant_uuid,
            employee_name: employee_name.into(),
            is_water: duties.water,
            is_sun: duties.sun,
            date,
            resolved: false,
            completed_on: None,
            additional_info: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.resolved {
            TaskStatus::Resolved
        } else {
            TaskStatus::Pending
        }
    }

    pub fn duties(&self) -> DutyCheck {
        DutyCheck {
            water: self.is_water,
            sun: self.is_sun,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn entity_type_roundtrip() {
        for t in [EntityType::Plant, EntityType::Zone, EntityType::Task] {
            assert_eq!(t.as_str().parse::<EntityType>().unwrap(), t);
        }
        assert!("PLANT_TYPE".parse::<EntityType>().is_err());
    }

    #[test]
    fn record_service_only_moves_forward() {
        let mut plant = Plant {
            uuid: Uuid::new_v4(),
            zone_uuid: None,
            name: "Fern".into(),
            water_requirement_days: 2,
            sun_requirement_days: 7,
            last_time_watered: date("2026-03-10"),
            last_time_sunlit: date("2026-03-01"),
            additional_info: None,
        };
        plant.record_service(true, false, date("2026-03-12"));
        assert_eq!(plant.last_time_watered, date("2026-03-12"));
        assert_eq!(plant.last_time_sunlit, date("2026-03-01"));

        plant.record_service(true, true, date("2026-03-11"));
        assert_eq!(plant.last_time_watered, date("2026-03-12"));
        assert_eq!(plant.last_time_sunlit, date("2026-03-11"));
    }

    #[test]
    fn new_task_is_pending() {
        let task = Task::new(
            Uuid::new_v4(),
            "Alice",
            DutyCheck {
                water: true,
                sun: false,
            },
            date("2026-03-12"),
        );
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(task.is_water);
        assert!(!task.is_sun);
        assert!(task.additional_info.is_none());
    }
}
