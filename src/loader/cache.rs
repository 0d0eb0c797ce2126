//! Resolution cache
//!
//! Four concurrent maps owned by one loader:
//!
//! | Map | Key | Value | Cleared by |
//! |-----|-----|-------|------------|
//! | units | unit name | defined unit | never |
//! | not found | unit name | shared miss record | `clear_not_found` |
//! | resources | resource name | first location or none | `clear_not_found` (misses only) |
//! | resource lists | resource name | every location | `clear_not_found` |
//!
//! Positive unit entries are written with insert-if-absent: when two
//! callers race to define the same name, the first insert wins and every
//! caller gets that instance.

use super::resource::ResourceUrl;
use super::unit::{LoadedUnit, UnitName};
use crate::error::{StrataError, StrataResult, UnitNotFound};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Memoized lookup results
#[derive(Debug, Default)]
pub struct ResolutionCache {
    names: DashMap<Arc<str>, ()>,
    units: DashMap<UnitName, Arc<LoadedUnit>>,
    not_found: DashMap<UnitName, Arc<UnitNotFound>>,
    resources: DashMap<String, Option<ResourceUrl>>,
    resource_lists: DashMap<String, Arc<[ResourceUrl]>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical shared instance of a name
    pub fn intern(&self, name: &str) -> UnitName {
        if let Some(existing) = self.names.get(name) {
            return UnitName::from_arc(existing.key().clone());
        }
        let entry = self.names.entry(Arc::from(name)).or_insert(());
        UnitName::from_arc(entry.key().clone())
    }

    /// Cached unit for `name`
    pub fn unit(&self, name: &str) -> Option<Arc<LoadedUnit>> {
        self.units.get(name).map(|r| r.value().clone())
    }

    pub fn contains_unit(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Insert if absent; returns whichever instance ended up cached.
    pub fn insert_unit(&self, name: UnitName, unit: Arc<LoadedUnit>) -> Arc<LoadedUnit> {
        self.units.entry(name).or_insert(unit).value().clone()
    }

    /// Insert a unit that must not exist yet.
    pub fn define_unit(&self, name: UnitName, unit: Arc<LoadedUnit>) -> StrataResult<Arc<LoadedUnit>> {
        match self.units.entry(name) {
            Entry::Occupied(existing) => {
                Err(StrataError::DuplicateDefinition(existing.key().to_string()))
            }
            Entry::Vacant(slot) => Ok(slot.insert(unit).value().clone()),
        }
    }

    /// Remembered miss for `name`
    pub fn not_found(&self, name: &str) -> Option<Arc<UnitNotFound>> {
        self.not_found.get(name).map(|r| r.value().clone())
    }

    /// Remember a miss; an existing record is kept.
    pub fn remember_not_found(&self, name: UnitName, miss: Arc<UnitNotFound>) -> Arc<UnitNotFound> {
        self.not_found.entry(name).or_insert(miss).value().clone()
    }

    /// Drop the miss for `name` if it is still exactly `miss`.
    pub fn forget_not_found(&self, name: &str, miss: &Arc<UnitNotFound>) {
        self.not_found
            .remove_if(name, |_, current| Arc::ptr_eq(current, miss));
    }

    /// Forget every remembered miss, unit and resource alike.
    ///
    /// Returns the number of unit misses dropped.
    pub fn clear_not_found(&self) -> usize {
        let dropped = self.not_found.len();
        self.not_found.clear();
        self.resources.retain(|_, found| found.is_some());
        self.resource_lists.clear();
        dropped
    }

    /// Cached first location; `Some(None)` is a remembered miss.
    pub fn resource(&self, name: &str) -> Option<Option<ResourceUrl>> {
        self.resources.get(name).map(|r| r.value().clone())
    }

    pub fn remember_resource(&self, name: &str, found: Option<ResourceUrl>) -> Option<ResourceUrl> {
        self.resources
            .entry(name.to_string())
            .or_insert(found)
            .value()
            .clone()
    }

    /// Cached list of every location
    pub fn resource_list(&self, name: &str) -> Option<Arc<[ResourceUrl]>> {
        self.resource_lists.get(name).map(|r| r.value().clone())
    }

    pub fn remember_resource_list(&self, name: &str, found: Vec<ResourceUrl>) -> Arc<[ResourceUrl]> {
        self.resource_lists
            .entry(name.to_string())
            .or_insert_with(|| Arc::from(found))
            .value()
            .clone()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found.len()
    }
}
