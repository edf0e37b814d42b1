//! Point-in-Polygon (PIP) region lookup.
//!
//! Regions are indexed by bounding box in an R-tree. A lookup filters
//! candidates through the tree, confirms containment with a crossing-number
//! test and, when nothing contains the point, falls back to the region owning
//! the nearest vertex.

pub mod geometry;
mod index;
mod nearest;
mod region;
mod resolve;
mod service;
mod snapshot;

pub use index::RegionIndex;
pub use nearest::{FallbackIndex, IndexedPoint, NearestPoint, FALLBACK_RADIUS};
pub use region::Region;
pub use resolve::{Locate, Lookup};
pub use service::{Loaded, PipService};
pub use snapshot::Snapshot;

/// Caller-supplied region identifier; not required to be unique.
pub type ExternalId = i64;

/// Dense internal region index, assigned in insertion order.
pub type RegionIdx = u32;

/// External id width stored by a [`Snapshot`].
pub type SnapshotId = u32;

/// External id reported when a lookup matches nothing.
pub const NOT_FOUND: ExternalId = -1;
