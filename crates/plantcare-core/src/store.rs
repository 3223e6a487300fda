//! Store gateway: a single logical table on top of redb.
//!
//! # Table design
//!
//! ```text
//! ITEMS            "<pk>\0<sk>"              -> JSON Item
//! TYPE_INDEX       "<TYPE>\0<sk>"            -> "<pk>\0<sk>"
//! SECONDARY_INDEX  "<gsi2>\0<pk>\0<sk>"      -> "<pk>\0<sk>"
//! ```
//!
//! The index tables are maintained inside the same write transaction as the
//! item itself, so an index never points at a missing or stale item. Every
//! write bumps the item's `version`; conditional writes compare against it.

use std::ops::Bound;
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlantError, Result};
use crate::types::{EntityType, Plant, Task, Zone};

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const ITEMS: TableDefinition<&str, &[u8]> = TableDefinition::new("items");
const TYPE_INDEX: TableDefinition<&str, &str> = TableDefinition::new("type_index");
const SECONDARY_INDEX: TableDefinition<&str, &str> = TableDefinition::new("secondary_index");

const SEP: char = '\0';

pub const MIN_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_PAGE_SIZE: usize = 50;

fn db_err(e: impl std::fmt::Display) -> PlantError {
    PlantError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// Keys and items
// ---------------------------------------------------------------------------

/// Composite primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub pk: String,
    pub sk: String,
}

impl Key {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Key of the entity of `entity_type` with identity `uuid`.
    pub fn of(entity_type: EntityType, uuid: &Uuid) -> Self {
        Self::new(entity_type.partition_key(uuid), uuid.to_string())
    }

    fn encoded(&self) -> String {
        format!("{}{SEP}{}", self.pk, self.sk)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.pk, self.sk)
    }
}

/// The stored shape shared by every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub pk: String,
    pub sk: String,
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsi1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsi2: Option<String>,
    /// Number of writes this item has seen; 0 means "never written".
    #[serde(default)]
    pub version: u64,
    pub data: serde_json::Value,
}

impl Item {
    pub fn key(&self) -> Key {
        Key::new(self.pk.clone(), self.sk.clone())
    }

    fn type_index_key(&self) -> String {
        format!("{}{SEP}{}", self.entity_type.as_str(), self.sk)
    }

    fn secondary_index_key(&self) -> Option<String> {
        self.gsi2
            .as_ref()
            .map(|g| format!("{g}{SEP}{}{SEP}{}", self.pk, self.sk))
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A typed entity that knows how to map itself onto an [`Item`].
pub trait Entity: Serialize + DeserializeOwned {
    const TYPE: EntityType;

    fn uuid(&self) -> Uuid;

    fn gsi1(&self) -> Option<String> {
        None
    }

    fn gsi2(&self) -> Option<String> {
        None
    }

    fn key(&self) -> Key {
        Key::of(Self::TYPE, &self.uuid())
    }

    fn to_item(&self) -> Result<Item> {
        let key = self.key();
        Ok(Item {
            pk: key.pk,
            sk: key.sk,
            entity_type: Self::TYPE,
            gsi1: self.gsi1(),
            gsi2: self.gsi2(),
            version: 0,
            data: serde_json::to_value(self)?,
        })
    }

    fn from_item(item: &Item) -> Result<Self> {
        if item.entity_type != Self::TYPE {
            return Err(PlantError::Store(format!(
                "item {} is a {}, expected {}",
                item.key(),
                item.entity_type,
                Self::TYPE
            )));
        }
        Ok(serde_json::from_value(item.data.clone())?)
    }
}

impl Entity for Plant {
    const TYPE: EntityType = EntityType::Plant;

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn gsi1(&self) -> Option<String> {
        Some(match &self.zone_uuid {
            Some(zone) => EntityType::Zone.partition_key(zone),
            None => "UNASSIGNED".to_string(),
        })
    }
}

impl Entity for Zone {
    const TYPE: EntityType = EntityType::Zone;

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Entity for Task {
    const TYPE: EntityType = EntityType::Task;

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn gsi1(&self) -> Option<String> {
        Some(self.date.to_string())
    }

    /// Tasks are indexed by the plant they care for.
    fn gsi2(&self) -> Option<String> {
        Some(EntityType::Plant.partition_key(&self.plant_uuid))
    }
}

/// An entity together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Opaque cursor returned as `last_key` by the previous page.
    #[serde(default)]
    pub start_key: Option<String>,
}

impl Page {
    pub fn first(page_size: usize) -> Self {
        Self {
            page_size: Some(page_size),
            start_key: None,
        }
    }

    /// Requested size clamped to `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
    pub fn size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when this was the last one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_key: Option<String>,
}

fn encode_cursor(index_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(index_key.as_bytes())
}

fn decode_cursor(cursor: &str, entity_type: EntityType) -> Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|e| PlantError::InvalidCursor(e.to_string()))?;
    let key = String::from_utf8(bytes).map_err(|e| PlantError::InvalidCursor(e.to_string()))?;
    if !key.starts_with(&format!("{}{SEP}", entity_type.as_str())) {
        return Err(PlantError::InvalidCursor(format!(
            "cursor does not belong to a {entity_type} listing"
        )));
    }
    Ok(key)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// One write inside a [`Store::transact`] batch.
#[derive(Debug, Clone)]
pub struct Write {
    pub item: Item,
    /// `Some(v)`: only write if the stored version is exactly `v`
    /// (`Some(0)` means the item must not exist yet).
    pub expected_version: Option<u64>,
}

impl Write {
    pub fn put<T: Entity>(entity: &T) -> Result<Self> {
        Ok(Self {
            item: entity.to_item()?,
            expected_version: None,
        })
    }

    pub fn put_if_version<T: Entity>(entity: &T, expected: u64) -> Result<Self> {
        Ok(Self {
            item: entity.to_item()?,
            expected_version: Some(expected),
        })
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    db: Database,
}

impl Store {
    /// Open or create the redb database at `path`, creating all tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path).map_err(db_err)?;
        Self::init(db)
    }

    /// A store that lives only as long as the returned value.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(db_err)?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self> {
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(ITEMS).map_err(db_err)?;
        wt.open_table(TYPE_INDEX).map_err(db_err)?;
        wt.open_table(SECONDARY_INDEX).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }

    // -----------------------------------------------------------------------
    // Raw item access
    // -----------------------------------------------------------------------

    pub fn get_item(&self, key: &Key) -> Result<Option<Item>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let items = rt.open_table(ITEMS).map_err(db_err)?;
        let found = items.get(key.encoded().as_str()).map_err(db_err)?;
        match found {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Unconditional write. Returns the new version.
    pub fn put_item(&self, item: Item) -> Result<u64> {
        let versions = self.transact(vec![Write {
            item,
            expected_version: None,
        }])?;
        Ok(versions[0])
    }

    /// Remove the item at `key` and its index entries. Returns whether
    /// anything was there.
    pub fn delete_item(&self, key: &Key) -> Result<bool> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let existed = {
            let mut items = wt.open_table(ITEMS).map_err(db_err)?;
            let mut type_index = wt.open_table(TYPE_INDEX).map_err(db_err)?;
            let mut secondary = wt.open_table(SECONDARY_INDEX).map_err(db_err)?;

            let old: Option<Item> = match items.remove(key.encoded().as_str()).map_err(db_err)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            if let Some(old) = &old {
                type_index
                    .remove(old.type_index_key().as_str())
                    .map_err(db_err)?;
                if let Some(k) = old.secondary_index_key() {
                    secondary.remove(k.as_str()).map_err(db_err)?;
                }
            }
            old.is_some()
        };
        wt.commit().map_err(db_err)?;
        Ok(existed)
    }

    /// Apply every write or none of them.
    ///
    /// Fails with [`PlantError::VersionConflict`] if any conditional write
    /// finds a different stored version; nothing is written in that case.
    /// Returns the new version of each item, in input order.
    pub fn transact(&self, writes: Vec<Write>) -> Result<Vec<u64>> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let versions = match Self::apply(&wt, writes) {
            Ok(v) => v,
            Err(e) => {
                wt.abort().map_err(db_err)?;
                return Err(e);
            }
        };
        wt.commit().map_err(db_err)?;
        Ok(versions)
    }

    fn apply(wt: &WriteTransaction, writes: Vec<Write>) -> Result<Vec<u64>> {
        let mut items = wt.open_table(ITEMS).map_err(db_err)?;
        let mut type_index = wt.open_table(TYPE_INDEX).map_err(db_err)?;
        let mut secondary = wt.open_table(SECONDARY_INDEX).map_err(db_err)?;

        let mut versions = Vec::with_capacity(writes.len());
        for Write {
            mut item,
            expected_version,
        } in writes
        {
            let primary = item.key().encoded();
            let old: Option<Item> = match items.get(primary.as_str()).map_err(db_err)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            let current = old.as_ref().map_or(0, |o| o.version);
            if let Some(expected) = expected_version {
                if expected != current {
                    return Err(PlantError::VersionConflict(item.key().to_string()));
                }
            }

            if let Some(old) = &old {
                type_index
                    .remove(old.type_index_key().as_str())
                    .map_err(db_err)?;
                if let Some(k) = old.secondary_index_key() {
                    secondary.remove(k.as_str()).map_err(db_err)?;
                }
            }

            item.version = current + 1;
            let bytes = serde_json::to_vec(&item)?;
            items
                .insert(primary.as_str(), bytes.as_slice())
                .map_err(db_err)?;
            type_index
                .insert(item.type_index_key().as_str(), primary.as_str())
                .map_err(db_err)?;
            if let Some(k) = item.secondary_index_key() {
                secondary
                    .insert(k.as_str(), primary.as_str())
                    .map_err(db_err)?;
            }
            versions.push(item.version);
        }
        Ok(versions)
    }

    /// One page of items of `entity_type`, in sort-key order.
    pub fn query_type(&self, entity_type: EntityType, page: &Page) -> Result<PageResult<Item>> {
        let prefix = format!("{}{SEP}", entity_type.as_str());
        let lower = match &page.start_key {
            Some(cursor) => Bound::Excluded(decode_cursor(cursor, entity_type)?),
            None => Bound::Included(prefix.clone()),
        };
        let upper = format!("{}\u{1}", entity_type.as_str());
        let size = page.size();

        let rt = self.db.begin_read().map_err(db_err)?;
        let type_index = rt.open_table(TYPE_INDEX).map_err(db_err)?;
        let items = rt.open_table(ITEMS).map_err(db_err)?;

        let range = (
            lower.as_ref().map(String::as_str),
            Bound::Excluded(upper.as_str()),
        );
        let mut out = Vec::with_capacity(size);
        let mut last_index_key = None;
        let mut has_more = false;
        for entry in type_index.range::<&str>(range).map_err(db_err)? {
            let (index_key, primary) = entry.map_err(db_err)?;
            if out.len() == size {
                has_more = true;
                break;
            }
            let guard = items
                .get(primary.value())
                .map_err(db_err)?
                .ok_or_else(|| PlantError::Store(format!("dangling index entry {}", primary.value())))?;
            out.push(serde_json::from_slice::<Item>(guard.value())?);
            last_index_key = Some(index_key.value().to_string());
        }

        Ok(PageResult {
            items: out,
            last_key: if has_more {
                last_index_key.as_deref().map(encode_cursor)
            } else {
                None
            },
        })
    }

    /// All items whose secondary key equals `gsi2`.
    pub fn query_secondary(&self, gsi2: &str) -> Result<Vec<Item>> {
        let lower = format!("{gsi2}{SEP}");
        let upper = format!("{gsi2}\u{1}");

        let rt = self.db.begin_read().map_err(db_err)?;
        let secondary = rt.open_table(SECONDARY_INDEX).map_err(db_err)?;
        let items = rt.open_table(ITEMS).map_err(db_err)?;

        let mut out = Vec::new();
        for entry in secondary
            .range::<&str>(lower.as_str()..upper.as_str())
            .map_err(db_err)?
        {
            let (_, primary) = entry.map_err(db_err)?;
            if let Some(guard) = items.get(primary.value()).map_err(db_err)? {
                out.push(serde_json::from_slice::<Item>(guard.value())?);
            }
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Typed access
    // -----------------------------------------------------------------------

    pub fn get<T: Entity>(&self, uuid: &Uuid) -> Result<Option<Versioned<T>>> {
        match self.get_item(&Key::of(T::TYPE, uuid))? {
            Some(item) => Ok(Some(Versioned {
                value: T::from_item(&item)?,
                version: item.version,
            })),
            None => Ok(None),
        }
    }

    pub fn put<T: Entity>(&self, entity: &T) -> Result<u64> {
        self.put_item(entity.to_item()?)
    }

    /// Write `entity` only if its stored version is still `expected`.
    pub fn put_if_version<T: Entity>(&self, entity: &T, expected: u64) -> Result<u64> {
        let versions = self.transact(vec![Write::put_if_version(entity, expected)?])?;
        Ok(versions[0])
    }

    pub fn delete<T: Entity>(&self, uuid: &Uuid) -> Result<bool> {
        self.delete_item(&Key::of(T::TYPE, uuid))
    }

    pub fn list<T: Entity>(&self, page: &Page) -> Result<PageResult<T>> {
        let raw = self.query_type(T::TYPE, page)?;
        let items = raw
            .items
            .iter()
            .map(T::from_item)
            .collect::<Result<Vec<_>>>()?;
        Ok(PageResult {
            items,
            last_key: raw.last_key,
        })
    }

    /// Every entity of type `T`, following cursors until exhausted.
    pub fn list_all<T: Entity>(&self) -> Result<Vec<T>> {
        let mut page = Page::first(MAX_PAGE_SIZE);
        let mut all = Vec::new();
        loop {
            let result = self.list::<T>(&page)?;
            all.extend(result.items);
            match result.last_key {
                Some(next) => page.start_key = Some(next),
                None => return Ok(all),
            }
        }
    }

    pub fn query_secondary_as<T: Entity>(&self, gsi2: &str) -> Result<Vec<T>> {
        self.query_secondary(gsi2)?
            .iter()
            .filter(|item| item.entity_type == T::TYPE)
            .map(T::from_item)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duty::DutyCheck;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    fn zone(name: &str) -> Zone {
        Zone {
            uuid: Uuid::new_v4(),
            name: name.into(),
            employees: vec!["Alice".into()],
        }
    }

    fn task_for(plant: Uuid) -> Task {
        Task::new(
            plant,
            "Alice",
            DutyCheck {
                water: true,
                sun: false,
            },
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
        )
    }

    #[test]
    fn put_then_get_returns_entity_with_version() {
        let (_dir, store) = open_tmp();
        let z = zone("Kitchen");
        assert_eq!(store.put(&z).unwrap(), 1);
        assert_eq!(store.put(&z).unwrap(), 2);

        let got = store.get::<Zone>(&z.uuid).unwrap().unwrap();
        assert_eq!(got.value, z);
        assert_eq!(got.version, 2);
    }

    #[test]
    fn get_missing_returns_none() {
        let (_dir, store) = open_tmp();
        assert!(store.get::<Zone>(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn conditional_write_rejects_stale_version() {
        let (_dir, store) = open_tmp();
        let z = zone("Lobby");
        store.put(&z).unwrap();

        assert_eq!(store.put_if_version(&z, 1).unwrap(), 2);
        let err = store.put_if_version(&z, 1).unwrap_err();
        assert!(matches!(err, PlantError::VersionConflict(_)));
        assert_eq!(store.get::<Zone>(&z.uuid).unwrap().unwrap().version, 2);
    }

    #[test]
    fn conflict_names_the_key_of_any_entity() {
        let (_dir, store) = open_tmp();
        let z = zone("Roof");
        store.put(&z).unwrap();
        let err = store.put_if_version(&z, 7).unwrap_err();
        assert!(matches!(err, PlantError::VersionConflict(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("ZONE#"), "{msg}");
        assert!(msg.ends_with("was modified concurrently"), "{msg}");
    }

    #[test]
    fn expected_zero_means_create_only() {
        let (_dir, store) = open_tmp();
        let z = zone("Lab");
        store.put_if_version(&z, 0).unwrap();
        assert!(store.put_if_version(&z, 0).is_err());
    }

    #[test]
    fn transact_is_all_or_nothing() {
        let (_dir, store) = open_tmp();
        let a = zone("A");
        let b = zone("B");
        store.put(&b).unwrap();

        // a would succeed, b has a stale expectation
        let err = store
            .transact(vec![
                Write::put(&a).unwrap(),
                Write::put_if_version(&b, 7).unwrap(),
            ])
            .unwrap_err();
        assert!(matches!(err, PlantError::VersionConflict(_)));
        assert!(store.get::<Zone>(&a.uuid).unwrap().is_none());
    }

    #[test]
    fn query_type_pages_with_cursor() {
        let (_dir, store) = open_tmp();
        for i in 0..25 {
            store.put(&zone(&format!("zone-{i}"))).unwrap();
        }
        store.put(&task_for(Uuid::new_v4())).unwrap();

        let first = store.list::<Zone>(&Page::first(10)).unwrap();
        assert_eq!(first.items.len(), 10);
        let cursor = first.last_key.clone().expect("more pages");

        let second = store
            .list::<Zone>(&Page {
                page_size: Some(10),
                start_key: Some(cursor),
            })
            .unwrap();
        assert_eq!(second.items.len(), 10);
        assert!(first
            .items
            .iter()
            .all(|z| !second.items.iter().any(|s| s.uuid == z.uuid)));

        assert_eq!(store.list_all::<Zone>().unwrap().len(), 25);
        assert_eq!(store.list_all::<Task>().unwrap().len(), 1);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(Page::first(1).size(), MIN_PAGE_SIZE);
        assert_eq!(Page::first(1000).size(), MAX_PAGE_SIZE);
        assert_eq!(Page::default().size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn last_page_has_no_cursor() {
        let (_dir, store) = open_tmp();
        for i in 0..10 {
            store.put(&zone(&format!("zone-{i}"))).unwrap();
        }
        let page = store.list::<Zone>(&Page::first(10)).unwrap();
        assert_eq!(page.items.len(), 10);
        assert!(page.last_key.is_none());
    }

    #[test]
    fn foreign_cursor_is_rejected() {
        let (_dir, store) = open_tmp();
        let cursor = encode_cursor("TASK\0abc");
        let err = store
            .list::<Zone>(&Page {
                page_size: None,
                start_key: Some(cursor),
            })
            .unwrap_err();
        assert!(matches!(err, PlantError::InvalidCursor(_)));

        let err = store
            .list::<Zone>(&Page {
                page_size: None,
                start_key: Some("%%%".into()),
            })
            .unwrap_err();
        assert!(matches!(err, PlantError::InvalidCursor(_)));
    }

    #[test]
    fn secondary_index_finds_tasks_by_plant() {
        let (_dir, store) = open_tmp();
        let plant = Uuid::new_v4();
        let t1 = task_for(plant);
        let t2 = task_for(plant);
        store.put(&t1).unwrap();
        store.put(&t2).unwrap();
        store.put(&task_for(Uuid::new_v4())).unwrap();

        let found: Vec<Task> = store
            .query_secondary_as(&EntityType::Plant.partition_key(&plant))
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn rewrite_does_not_duplicate_index_entries() {
        let (_dir, store) = open_tmp();
        let plant = Uuid::new_v4();
        let mut t = task_for(plant);
        store.put(&t).unwrap();
        t.employee_name = "Bob".into();
        store.put(&t).unwrap();

        assert_eq!(store.list_all::<Task>().unwrap().len(), 1);
        let found: Vec<Task> = store
            .query_secondary_as(&EntityType::Plant.partition_key(&plant))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_name, "Bob");
    }

    #[test]
    fn delete_removes_item_and_index_entries() {
        let (_dir, store) = open_tmp();
        let plant = Uuid::new_v4();
        let t = task_for(plant);
        store.put(&t).unwrap();

        assert!(store.delete::<Task>(&t.uuid).unwrap());
        assert!(store.get::<Task>(&t.uuid).unwrap().is_none());
        assert!(store.list_all::<Task>().unwrap().is_empty());
        let found: Vec<Task> = store
            .query_secondary_as(&EntityType::Plant.partition_key(&plant))
            .unwrap();
        assert!(found.is_empty());
        assert!(!store.delete::<Task>(&t.uuid).unwrap());
    }

    #[test]
    fn recreate_after_delete_starts_at_version_one() {
        let (_dir, store) = open_tmp();
        let z = zone("Roof");
        store.put(&z).unwrap();
        store.put(&z).unwrap();
        store.delete::<Zone>(&z.uuid).unwrap();
        assert_eq!(store.put_if_version(&z, 0).unwrap(), 1);
    }

    #[test]
    fn in_memory_store_works() {
        let store = Store::open_in_memory().unwrap();
        let z = zone("Roof");
        store.put(&z).unwrap();
        assert!(store.get::<Zone>(&z.uuid).unwrap().is_some());
    }
}
