//! PIP service holding the snapshot currently used for lookups.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use geo_types::Coord;
use tracing::{debug, info};

use super::{Locate, Lookup, Snapshot};

/// A served snapshot together with the time it was swapped in.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub snapshot: Arc<Snapshot>,
    pub loaded_at: DateTime<Utc>,
}

impl Loaded {
    fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            loaded_at: Utc::now(),
        }
    }
}

/// Point-in-Polygon lookup service with hot-swappable snapshots.
///
/// The lock only guards the pointer and its load time: lookups clone the `Arc`
/// and query the snapshot without holding it, so a swap never waits on
/// in-flight queries and those queries finish against the snapshot they
/// started with.
pub struct PipService {
    current: RwLock<Loaded>,
}

impl PipService {
    /// Create a new PIP service serving `snapshot`
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Loaded::new(snapshot)),
        }
    }

    /// The snapshot new lookups will use
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current().snapshot
    }

    /// The served snapshot and its load time, read under one lock
    pub fn current(&self) -> Loaded {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the served snapshot, returning the previous one
    pub fn swap(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let next = Loaded::new(snapshot);
        let regions = next.snapshot.len();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        drop(guard);

        info!(
            "Swapped snapshot: {} -> {} regions",
            previous.snapshot.len(),
            regions
        );
        previous.snapshot
    }

    /// Resolve a single point (`lon`, `lat`)
    pub fn lookup(&self, lon: f64, lat: f64) -> Lookup {
        let result = self.snapshot().search_lon_lat(lon, lat);
        debug!(
            "PIP lookup at ({}, {}): {} id={} distance={}",
            lon,
            lat,
            result.kind(),
            result.id(),
            result.distance()
        );
        result
    }

    /// Resolve a batch of points against one snapshot
    pub fn lookup_many(&self, points: &[Coord<f64>]) -> Vec<Lookup> {
        self.snapshot().search_many(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pip::{Region, RegionIndex};

    fn snapshot_with(id: i64, x0: f64) -> Snapshot {
        let mut index = RegionIndex::new();
        index
            .add(
                id,
                Region::from_pairs(&[[x0, 0.0], [x0 + 10.0, 0.0], [x0 + 10.0, 10.0], [x0, 10.0]]),
            )
            .unwrap();
        index.export().unwrap()
    }

    #[test]
    fn test_empty_service() {
        let service = PipService::new(RegionIndex::new().export().unwrap());
        let result = service.lookup(8.5, 47.4);
        assert_eq!(result, Lookup::NotFound);
        assert_eq!(result.id(), -1);
    }

    #[test]
    fn test_swap_keeps_old_snapshot_alive() {
        let service = PipService::new(snapshot_with(1, 0.0));
        let held = service.snapshot();

        let previous = service.swap(snapshot_with(2, 100.0));
        assert!(Arc::ptr_eq(&held, &previous));

        // In-flight readers keep answering from the old snapshot
        assert_eq!(held.search_lon_lat(5.0, 5.0).id(), 1);

        // New lookups see the new one
        assert_eq!(service.lookup(5.0, 5.0), Lookup::NotFound);
        assert_eq!(service.lookup(105.0, 5.0).id(), 2);
    }

    #[test]
    fn test_swap_updates_load_time_with_snapshot() {
        let service = PipService::new(snapshot_with(1, 0.0));
        let first = service.current();
        assert_eq!(first.snapshot.len(), 1);

        service.swap(RegionIndex::new().export().unwrap());
        let second = service.current();
        assert!(second.snapshot.is_empty());
        assert!(second.loaded_at >= first.loaded_at);

        // A held view keeps its own pair
        assert_eq!(first.snapshot.search_lon_lat(5.0, 5.0).id(), 1);
    }

    #[test]
    fn test_lookup_many() {
        let service = PipService::new(snapshot_with(3, 0.0));
        let results = service.lookup_many(&[Coord { x: 1.0, y: 1.0 }, Coord { x: 50.0, y: 1.0 }]);
        assert_eq!(results[0].id(), 3);
        assert!(!results[1].is_found());
    }
}
