//! Seeding and lookup of plants and zones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlantError, Result};
use crate::lifecycle::MAX_CONFLICT_RETRIES;
use crate::store::{Entity, Store, Versioned};
use crate::types::{Plant, Zone};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlant {
    pub name: String,
    #[serde(default)]
    pub zone_uuid: Option<Uuid>,
    pub water_requirement_days: u32,
    pub sun_requirement_days: u32,
    /// Defaults to the creation date.
    #[serde(default)]
    pub last_time_watered: Option<NaiveDate>,
    #[serde(default)]
    pub last_time_sunlit: Option<NaiveDate>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

/// Field edits for [`update_plant`]; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub water_requirement_days: Option<u32>,
    #[serde(default)]
    pub sun_requirement_days: Option<u32>,
    /// An empty string clears the notes.
    #[serde(default)]
    pub additional_info: Option<String>,
}

fn plant_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(PlantError::InvalidPlant("name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn interval(field: &str, days: u32) -> Result<u32> {
    if days == 0 {
        return Err(PlantError::InvalidPlant(format!("{field} must be positive")));
    }
    Ok(days)
}

pub fn create_plant(store: &Store, new: NewPlant, today: NaiveDate) -> Result<Plant> {
    let name = plant_name(&new.name)?;
    interval("water_requirement_days", new.water_requirement_days)?;
    interval("sun_requirement_days", new.sun_requirement_days)?;
    if let Some(zone) = &new.zone_uuid {
        get_zone(store, zone)?;
    }

    let plant = Plant {
        uuid: Uuid::new_v4(),
        zone_uuid: new.zone_uuid,
        name,
        water_requirement_days: new.water_requirement_days,
        sun_requirement_days: new.sun_requirement_days,
        last_time_watered: new.last_time_watered.unwrap_or(today),
        last_time_sunlit: new.last_time_sunlit.unwrap_or(today),
        additional_info: new.additional_info.filter(|s| !s.trim().is_empty()),
    };
    store.put(&plant)?;
    tracing::info!(plant = %plant.name, uuid = %plant.uuid, "plant created");
    Ok(plant)
}

pub fn get_plant(store: &Store, uuid: &Uuid) -> Result<Plant> {
    store
        .get::<Plant>(uuid)?
        .map(|v| v.value)
        .ok_or_else(|| PlantError::PlantNotFound(uuid.to_string()))
}

/// All plants sorted by name.
pub fn list_plants(store: &Store) -> Result<Vec<Plant>> {
    let mut plants = store.list_all::<Plant>()?;
    plants.sort_by(|a, b| a.name.cmp(&b.name).then(a.uuid.cmp(&b.uuid)));
    Ok(plants)
}

/// Move a plant into `zone`, or out of every zone with `None`.
pub fn assign_plant(store: &Store, plant: &Uuid, zone: Option<Uuid>) -> Result<Plant> {
    if let Some(zone) = &zone {
        get_zone(store, zone)?;
    }
    edit_plant(store, plant, |current| {
        current.zone_uuid = zone;
        Ok(())
    })
}

/// Change a plant's name, care intervals or notes. Serviced dates are left
/// to task completion.
pub fn update_plant(store: &Store, plant: &Uuid, update: PlantUpdate) -> Result<Plant> {
    let name = update.name.as_deref().map(plant_name).transpose()?;
    let water = update
        .water_requirement_days
        .map(|d| interval("water_requirement_days", d))
        .transpose()?;
    let sun = update
        .sun_requirement_days
        .map(|d| interval("sun_requirement_days", d))
        .transpose()?;

    let updated = edit_plant(store, plant, |current| {
        if let Some(name) = &name {
            current.name = name.clone();
        }
        if let Some(days) = water {
            current.water_requirement_days = days;
        }
        if let Some(days) = sun {
            current.sun_requirement_days = days;
        }
        if let Some(info) = &update.additional_info {
            let info = info.trim();
            current.additional_info = (!info.is_empty()).then(|| info.to_string());
        }
        Ok(())
    })?;
    tracing::info!(plant = %updated.name, uuid = %updated.uuid, "plant updated");
    Ok(updated)
}

/// Remove a plant. Its tasks stay; completing one later resolves the task
/// alone.
pub fn delete_plant(store: &Store, plant: &Uuid) -> Result<()> {
    if !store.delete::<Plant>(plant)? {
        return Err(PlantError::PlantNotFound(plant.to_string()));
    }
    tracing::info!(uuid = %plant, "plant deleted");
    Ok(())
}

/// Read-modify-write of one plant, conditional on the version read so a
/// concurrent completion is never overwritten with stale dates.
fn edit_plant(
    store: &Store,
    uuid: &Uuid,
    edit: impl FnMut(&mut Plant) -> Result<()>,
) -> Result<Plant> {
    edit_versioned(store, uuid, PlantError::PlantNotFound, edit)
}

fn edit_versioned<T: Entity>(
    store: &Store,
    uuid: &Uuid,
    not_found: fn(String) -> PlantError,
    mut edit: impl FnMut(&mut T) -> Result<()>,
) -> Result<T> {
    for _ in 0..MAX_CONFLICT_RETRIES {
        let Versioned { mut value, version } = store
            .get::<T>(uuid)?
            .ok_or_else(|| not_found(uuid.to_string()))?;
        edit(&mut value)?;
        match store.put_if_version(&value, version) {
            Ok(_) => return Ok(value),
            Err(PlantError::VersionConflict(key)) => {
                tracing::debug!(%key, "concurrent write, re-reading");
            }
            Err(e) => return Err(e),
        }
    }
    Err(PlantError::VersionConflict(uuid.to_string()))
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// Field edits for [`update_zone`]; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneUpdate {
    #[serde(default)]
    pub name: Option<String>,
    /// Replaces the whole roster, in rotation order.
    #[serde(default)]
    pub employees: Option<Vec<String>>,
}

fn zone_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(PlantError::InvalidZone("name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn roster(employees: &[String]) -> Result<Vec<String>> {
    let employees: Vec<String> = employees.iter().map(|e| e.trim().to_string()).collect();
    if employees.iter().any(String::is_empty) {
        return Err(PlantError::InvalidZone(
            "employee names must not be empty".into(),
        ));
    }
    Ok(employees)
}

pub fn create_zone(store: &Store, name: &str, employees: Vec<String>) -> Result<Zone> {
    let zone = Zone {
        uuid: Uuid::new_v4(),
        name: zone_name(name)?,
        employees: roster(&employees)?,
    };
    store.put(&zone)?;
    tracing::info!(zone = %zone.name, uuid = %zone.uuid, "zone created");
    Ok(zone)
}

/// Rename a zone or replace its roster. The next schedule run rotates over
/// the new roster from its first entry.
pub fn update_zone(store: &Store, zone: &Uuid, update: ZoneUpdate) -> Result<Zone> {
    let name = update.name.as_deref().map(zone_name).transpose()?;
    let employees = update.employees.as_deref().map(roster).transpose()?;

    let updated = edit_versioned(store, zone, PlantError::ZoneNotFound, |current: &mut Zone| {
        if let Some(name) = &name {
            current.name = name.clone();
        }
        if let Some(employees) = &employees {
            current.employees = employees.clone();
        }
        Ok(())
    })?;
    tracing::info!(zone = %updated.name, uuid = %updated.uuid, "zone updated");
    Ok(updated)
}

/// Remove a zone and take its plants out of it, so they are reported as
/// unassigned instead of pointing at a missing zone. Returns the plants
/// that were unassigned.
pub fn delete_zone(store: &Store, zone: &Uuid) -> Result<Vec<Plant>> {
    get_zone(store, zone)?;
    let mut unassigned = Vec::new();
    for plant in list_plants(store)? {
        if plant.zone_uuid != Some(*zone) {
            continue;
        }
        let updated = edit_plant(store, &plant.uuid, |current| {
            if current.zone_uuid == Some(*zone) {
                current.zone_uuid = None;
            }
            Ok(())
        })?;
        unassigned.push(updated);
    }
    store.delete::<Zone>(zone)?;
    tracing::info!(uuid = %zone, plants = unassigned.len(), "zone deleted");
    Ok(unassigned)
}

pub fn get_zone(store: &Store, uuid: &Uuid) -> Result<Zone> {
    store
        .get::<Zone>(uuid)?
        .map(|v| v.value)
        .ok_or_else(|| PlantError::ZoneNotFound(uuid.to_string()))
}

/// All zones sorted by name.
pub fn list_zones(store: &Store) -> Result<Vec<Zone>> {
    let mut zones = store.list_all::<Zone>()?;
    zones.sort_by(|a, b| a.name.cmp(&b.name).then(a.uuid.cmp(&b.uuid)));
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        "2026-03-12".parse().unwrap()
    }

    fn fern(zone: Option<Uuid>) -> NewPlant {
        NewPlant {
            name: "Fern".into(),
            zone_uuid: zone,
            water_requirement_days: 2,
            sun_requirement_days: 7,
            last_time_watered: None,
            last_time_sunlit: None,
            additional_info: None,
        }
    }

    #[test]
    fn create_plant_defaults_dates_to_today() {
        let store = Store::open_in_memory().unwrap();
        let plant = create_plant(&store, fern(None), today()).unwrap();
        assert_eq!(plant.last_time_watered, today());
        assert_eq!(plant.last_time_sunlit, today());
        assert_eq!(get_plant(&store, &plant.uuid).unwrap(), plant);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let mut new = fern(None);
        new.sun_requirement_days = 0;
        let err = create_plant(&store, new, today()).unwrap_err();
        assert!(matches!(err, PlantError::InvalidPlant(_)));
    }

    #[test]
    fn blank_name_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let mut new = fern(None);
        new.name = "  ".into();
        assert!(create_plant(&store, new, today()).is_err());
        assert!(create_zone(&store, "", vec![]).is_err());
    }

    #[test]
    fn plant_in_unknown_zone_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let err = create_plant(&store, fern(Some(Uuid::new_v4())), today()).unwrap_err();
        assert!(matches!(err, PlantError::ZoneNotFound(_)));
    }

    #[test]
    fn zone_roster_keeps_order() {
        let store = Store::open_in_memory().unwrap();
        let zone = create_zone(&store, "Kitchen", vec!["Bob".into(), " Alice ".into()]).unwrap();
        assert_eq!(zone.employees, ["Bob", "Alice"]);
        assert!(create_zone(&store, "Hall", vec!["".into()]).is_err());
    }

    #[test]
    fn lists_are_sorted_by_name() {
        let store = Store::open_in_memory().unwrap();
        create_zone(&store, "Roof", vec![]).unwrap();
        create_zone(&store, "Atrium", vec![]).unwrap();
        let names: Vec<String> = list_zones(&store)
            .unwrap()
            .into_iter()
            .map(|z| z.name)
            .collect();
        assert_eq!(names, ["Atrium", "Roof"]);
    }

    #[test]
    fn assign_moves_plant_between_zones() {
        let store = Store::open_in_memory().unwrap();
        let zone = create_zone(&store, "Kitchen", vec!["Alice".into()]).unwrap();
        let plant = create_plant(&store, fern(None), today()).unwrap();

        let moved = assign_plant(&store, &plant.uuid, Some(zone.uuid)).unwrap();
        assert_eq!(moved.zone_uuid, Some(zone.uuid));
        let cleared = assign_plant(&store, &plant.uuid, None).unwrap();
        assert!(cleared.zone_uuid.is_none());
    }

    #[test]
    fn assign_keeps_dates_written_by_a_concurrent_completion() {
        let store = Store::open_in_memory().unwrap();
        let zone = create_zone(&store, "Kitchen", vec!["Alice".into()]).unwrap();
        let plant = create_plant(&store, fern(None), today()).unwrap();
        let later: NaiveDate = "2026-03-20".parse().unwrap();

        let mut attempts = 0;
        let moved = edit_plant(&store, &plant.uuid, |current| {
            attempts += 1;
            if attempts == 1 {
                // A completion lands between our read and our write.
                let mut serviced = current.clone();
                serviced.record_service(true, true, later);
                store.put(&serviced).unwrap();
            }
            current.zone_uuid = Some(zone.uuid);
            Ok(())
        })
        .unwrap();

        assert_eq!(attempts, 2);
        assert_eq!(moved.zone_uuid, Some(zone.uuid));
        let stored = get_plant(&store, &plant.uuid).unwrap();
        assert_eq!(stored.last_time_watered, later);
        assert_eq!(stored.last_time_sunlit, later);
    }

    #[test]
    fn update_plant_changes_only_given_fields() {
        let store = Store::open_in_memory().unwrap();
        let mut new = fern(None);
        new.additional_info = Some("north window".into());
        let plant = create_plant(&store, new, today()).unwrap();

        let updated = update_plant(
            &store,
            &plant.uuid,
            PlantUpdate {
                water_requirement_days: Some(4),
                ..PlantUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(updated.water_requirement_days, 4);
        assert_eq!(updated.sun_requirement_days, 7);
        assert_eq!(updated.additional_info.as_deref(), Some("north window"));
        assert_eq!(updated.last_time_watered, plant.last_time_watered);

        let cleared = update_plant(
            &store,
            &plant.uuid,
            PlantUpdate {
                additional_info: Some("  ".into()),
                ..PlantUpdate::default()
            },
        )
        .unwrap();
        assert!(cleared.additional_info.is_none());
    }

    #[test]
    fn update_plant_validates_before_writing() {
        let store = Store::open_in_memory().unwrap();
        let plant = create_plant(&store, fern(None), today()).unwrap();
        let err = update_plant(
            &store,
            &plant.uuid,
            PlantUpdate {
                sun_requirement_days: Some(0),
                ..PlantUpdate::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, PlantError::InvalidPlant(_)));
        assert_eq!(store.get::<Plant>(&plant.uuid).unwrap().unwrap().version, 1);

        let missing = update_plant(&store, &Uuid::new_v4(), PlantUpdate::default()).unwrap_err();
        assert!(matches!(missing, PlantError::PlantNotFound(_)));
    }

    #[test]
    fn delete_plant_removes_it_once() {
        let store = Store::open_in_memory().unwrap();
        let plant = create_plant(&store, fern(None), today()).unwrap();
        delete_plant(&store, &plant.uuid).unwrap();
        assert!(list_plants(&store).unwrap().is_empty());
        assert!(matches!(
            delete_plant(&store, &plant.uuid).unwrap_err(),
            PlantError::PlantNotFound(_)
        ));
    }

    #[test]
    fn update_zone_replaces_roster_in_order() {
        let store = Store::open_in_memory().unwrap();
        let zone = create_zone(&store, "Kitchen", vec!["Alice".into(), "Bob".into()]).unwrap();

        let updated = update_zone(
            &store,
            &zone.uuid,
            ZoneUpdate {
                employees: Some(vec!["Carol".into(), " Alice ".into()]),
                ..ZoneUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Kitchen");
        assert_eq!(updated.employees, ["Carol", "Alice"]);
        assert_eq!(get_zone(&store, &zone.uuid).unwrap(), updated);

        let renamed = update_zone(
            &store,
            &zone.uuid,
            ZoneUpdate {
                name: Some("Galley".into()),
                ..ZoneUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(renamed.name, "Galley");
        assert_eq!(renamed.employees, ["Carol", "Alice"]);
    }

    #[test]
    fn update_zone_rejects_blank_entries() {
        let store = Store::open_in_memory().unwrap();
        let zone = create_zone(&store, "Kitchen", vec!["Alice".into()]).unwrap();
        let err = update_zone(
            &store,
            &zone.uuid,
            ZoneUpdate {
                employees: Some(vec!["Bob".into(), " ".into()]),
                ..ZoneUpdate::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, PlantError::InvalidZone(_)));
        assert_eq!(get_zone(&store, &zone.uuid).unwrap().employees, ["Alice"]);
    }

    #[test]
    fn delete_zone_unassigns_its_plants() {
        let store = Store::open_in_memory().unwrap();
        let kitchen = create_zone(&store, "Kitchen", vec!["Alice".into()]).unwrap();
        let roof = create_zone(&store, "Roof", vec!["Bob".into()]).unwrap();
        let fern_plant = create_plant(&store, fern(Some(kitchen.uuid)), today()).unwrap();
        let mut cactus = fern(Some(roof.uuid));
        cactus.name = "Cactus".into();
        let cactus = create_plant(&store, cactus, today()).unwrap();

        let unassigned = delete_zone(&store, &kitchen.uuid).unwrap();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].uuid, fern_plant.uuid);

        assert!(get_plant(&store, &fern_plant.uuid).unwrap().zone_uuid.is_none());
        assert_eq!(get_plant(&store, &cactus.uuid).unwrap().zone_uuid, Some(roof.uuid));
        assert!(matches!(
            get_zone(&store, &kitchen.uuid).unwrap_err(),
            PlantError::ZoneNotFound(_)
        ));
        assert!(delete_zone(&store, &kitchen.uuid).is_err());
    }
}
