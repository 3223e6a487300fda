use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{PlantError, Result};
use crate::store::Store;
use crate::types::Zone;

struct Slot {
    cursor: usize,
    roster: Vec<String>,
}

/// Round-robin assignment over each zone's roster for the duration of one run.
///
/// Zones are read from the store the first time they are referenced and
/// cached afterwards. Cursors start at the head of the roster on every run.
pub struct ZoneRotator<'a> {
    store: &'a Store,
    slots: HashMap<Uuid, Slot>,
}

impl<'a> ZoneRotator<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            slots: HashMap::new(),
        }
    }

    /// Employee for the next due plant in `zone_uuid`.
    pub fn next_employee(&mut self, zone_uuid: &Uuid) -> Result<String> {
        if !self.slots.contains_key(zone_uuid) {
            let zone = self
                .store
                .get::<Zone>(zone_uuid)?
                .ok_or_else(|| PlantError::ZoneNotFound(zone_uuid.to_string()))?
                .value;
            tracing::debug!(zone = %zone.name, employees = zone.employees.len(), "loaded zone roster");
            self.slots.insert(
                *zone_uuid,
                Slot {
                    cursor: 0,
                    roster: zone.employees,
                },
            );
        }

        let slot = self
            .slots
            .get_mut(zone_uuid)
            .ok_or_else(|| PlantError::ZoneNotFound(zone_uuid.to_string()))?;
        if slot.roster.is_empty() {
            return Err(PlantError::EmptyRoster(zone_uuid.to_string()));
        }
        let employee = slot.roster[slot.cursor].clone();
        slot.cursor = (slot.cursor + 1) % slot.roster.len();
        Ok(employee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_zone(employees: &[&str]) -> (Store, Uuid) {
        let store = Store::open_in_memory().unwrap();
        let zone = Zone {
            uuid: Uuid::new_v4(),
            name: "Kitchen".into(),
            employees: employees.iter().map(|e| e.to_string()).collect(),
        };
        store.put(&zone).unwrap();
        (store, zone.uuid)
    }

    #[test]
    fn rotates_in_roster_order_and_wraps() {
        let (store, zone) = store_with_zone(&["Alice", "Bob", "Carol"]);
        let mut rotator = ZoneRotator::new(&store);
        let picks: Vec<String> = (0..5)
            .map(|_| rotator.next_employee(&zone).unwrap())
            .collect();
        assert_eq!(picks, ["Alice", "Bob", "Carol", "Alice", "Bob"]);
    }

    #[test]
    fn single_employee_gets_everything() {
        let (store, zone) = store_with_zone(&["Alice"]);
        let mut rotator = ZoneRotator::new(&store);
        for _ in 0..3 {
            assert_eq!(rotator.next_employee(&zone).unwrap(), "Alice");
        }
    }

    #[test]
    fn empty_roster_is_an_error() {
        let (store, zone) = store_with_zone(&[]);
        let mut rotator = ZoneRotator::new(&store);
        let err = rotator.next_employee(&zone).unwrap_err();
        assert!(matches!(err, PlantError::EmptyRoster(_)));
        // still an error on the next call, not a panic
        assert!(rotator.next_employee(&zone).is_err());
    }

    #[test]
    fn unknown_zone_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let mut rotator = ZoneRotator::new(&store);
        let err = rotator.next_employee(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, PlantError::ZoneNotFound(_)));
    }

    #[test]
    fn each_run_starts_from_the_head() {
        let (store, zone) = store_with_zone(&["Alice", "Bob"]);
        let mut first = ZoneRotator::new(&store);
        assert_eq!(first.next_employee(&zone).unwrap(), "Alice");
        let mut second = ZoneRotator::new(&store);
        assert_eq!(second.next_employee(&zone).unwrap(), "Alice");
    }

    #[test]
    fn roster_is_cached_for_the_run() {
        let (store, zone_uuid) = store_with_zone(&["Alice", "Bob"]);
        let mut rotator = ZoneRotator::new(&store);
        assert_eq!(rotator.next_employee(&zone_uuid).unwrap(), "Alice");

        let mut zone = store.get::<Zone>(&zone_uuid).unwrap().unwrap().value;
        zone.employees = vec!["Zed".into()];
        store.put(&zone).unwrap();

        assert_eq!(rotator.next_employee(&zone_uuid).unwrap(), "Bob");
    }
}
