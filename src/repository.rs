// src/repository.rs
//! In-memory waypoint collection with export selection and change notification

use crate::error::{ConverterError, Result};
use crate::waypoint::{Waypoint, WaypointView};
use log::{debug, error};
use std::collections::{BTreeMap, HashSet};

/// Receives a fresh snapshot of the collection after every notifying mutation.
pub trait WaypointObserver {
    fn notify(&mut self, waypoints: &[WaypointView]);
}

impl<F> WaypointObserver for F
where
    F: FnMut(&[WaypointView]),
{
    fn notify(&mut self, waypoints: &[WaypointView]) {
        self(waypoints)
    }
}

/// Waypoints keyed by name.
///
/// Every mutation that changes the collection (`add`, `add_all`,
/// `replace_all`, `remove`, `toggle_export`, `clear`) notifies all observers
/// synchronously, in subscription order, before returning. Failed operations
/// leave the collection untouched and notify nobody.
#[derive(Default)]
pub struct WaypointRepository {
    waypoints: BTreeMap<String, Waypoint>,
    observers: Vec<Box<dyn WaypointObserver>>,
}

impl WaypointRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn WaypointObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.waypoints.contains_key(name)
    }

    pub fn add(&mut self, waypoint: Waypoint, overwrite: bool) -> Result<()> {
        if !overwrite && self.waypoints.contains_key(waypoint.name()) {
            return Err(duplicate_error(waypoint.name()));
        }
        self.waypoints.insert(waypoint.name().to_string(), waypoint);
        self.notify_observers();
        Ok(())
    }

    /// Insert a batch as one step: either every waypoint goes in or none does.
    ///
    /// Without `overwrite`, a name already stored or repeated inside the batch
    /// rejects the whole batch. Observers are notified once. Returns the
    /// number of distinct names written.
    pub fn add_all(&mut self, waypoints: Vec<Waypoint>, overwrite: bool) -> Result<usize> {
        if !overwrite {
            check_batch(&waypoints, Some(&self.waypoints))?;
        }
        if waypoints.is_empty() {
            return Ok(0);
        }

        let mut written = HashSet::with_capacity(waypoints.len());
        for waypoint in waypoints {
            let name = waypoint.name().to_string();
            written.insert(name.clone());
            self.waypoints.insert(name, waypoint);
        }
        let count = written.len();
        debug!("added {} waypoints", count);
        self.notify_observers();
        Ok(count)
    }

    /// Swap the whole collection for `waypoints`, notifying once.
    pub fn replace_all(&mut self, waypoints: Vec<Waypoint>, overwrite: bool) -> Result<usize> {
        if !overwrite {
            check_batch(&waypoints, None)?;
        }

        self.waypoints = waypoints
            .into_iter()
            .map(|waypoint| (waypoint.name().to_string(), waypoint))
            .collect();
        debug!("replaced collection with {} waypoints", self.waypoints.len());
        self.notify_observers();
        Ok(self.waypoints.len())
    }

    pub fn remove(&mut self, name: &str) -> Result<Waypoint> {
        let removed = self.waypoints.remove(name).ok_or_else(|| {
            debug!("removing waypoint failed: {} not found in the collection", name);
            not_found_error(name)
        })?;
        self.notify_observers();
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Result<&Waypoint> {
        self.waypoints.get(name).ok_or_else(|| {
            error!("retrieving waypoint failed: {} not found in the collection", name);
            not_found_error(name)
        })
    }

    /// Flip the export flag of `name`; returns the new value.
    pub fn toggle_export(&mut self, name: &str) -> Result<bool> {
        let waypoint = self
            .waypoints
            .get_mut(name)
            .ok_or_else(|| not_found_error(name))?;
        waypoint.toggle_export();
        let export = waypoint.is_export();
        self.notify_observers();
        Ok(export)
    }

    pub fn clear(&mut self) {
        debug!("removing all waypoints");
        self.waypoints.clear();
        self.notify_observers();
    }

    /// Waypoints flagged for export, ordered by name.
    pub fn export_set(&self) -> Vec<Waypoint> {
        let export: Vec<Waypoint> = self
            .waypoints
            .values()
            .filter(|waypoint| waypoint.is_export())
            .cloned()
            .collect();
        debug!("waypoints set for export: {}", export.len());
        export
    }

    /// Current projection of the collection, ordered by name.
    pub fn views(&self) -> Result<Vec<WaypointView>> {
        self.waypoints.values().map(Waypoint::to_view).collect()
    }

    /// Deliver the current views to every observer.
    ///
    /// If any projection fails the collection is cleared and observers get an
    /// empty list instead of a partial one.
    fn notify_observers(&mut self) {
        let views = match self.views() {
            Ok(views) => views,
            Err(e) => {
                error!("{}; clearing the waypoint collection", e);
                self.waypoints.clear();
                Vec::new()
            }
        };

        for observer in self.observers.iter_mut() {
            observer.notify(&views);
        }
    }

    #[cfg(test)]
    fn insert_unchecked(&mut self, waypoint: Waypoint) {
        self.waypoints.insert(waypoint.name().to_string(), waypoint);
    }
}

fn check_batch(batch: &[Waypoint], stored: Option<&BTreeMap<String, Waypoint>>) -> Result<()> {
    let mut seen = HashSet::with_capacity(batch.len());
    for waypoint in batch {
        let name = waypoint.name();
        let stored_already = stored.map_or(false, |stored| stored.contains_key(name));
        if stored_already || !seen.insert(name) {
            return Err(duplicate_error(name));
        }
    }
    Ok(())
}

fn duplicate_error(name: &str) -> ConverterError {
    debug!("trying to add waypoint with duplicate name: {}", name);
    ConverterError::AlreadyExists(format!(
        "trying to add waypoint with duplicate name: {}",
        name
    ))
}

fn not_found_error(name: &str) -> ConverterError {
    ConverterError::NotFound(format!("{} not found in the collection", name))
}
