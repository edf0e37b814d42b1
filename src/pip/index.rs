//! Mutable region index builder.

use geo_types::Coord;
use rstar::RTree;
use tracing::{debug, info, warn};

use super::nearest::FallbackIndex;
use super::resolve::{resolve, IndexedRegion, Locate, Lookup};
use super::snapshot::Snapshot;
use super::{ExternalId, Region, RegionIdx};
use crate::error::{IndexError, Result};

/// Region index under construction.
///
/// Regions get dense internal indices in insertion order. All mutation goes
/// through `&mut self`; call [`RegionIndex::export`] to obtain a [`Snapshot`]
/// that can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    tree: RTree<IndexedRegion>,
    regions: Vec<Region>,
    /// External id per internal index
    ids: Vec<ExternalId>,
    fallback: Option<FallbackIndex>,
}

impl RegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region tagged with `id`, returning its internal index.
    ///
    /// Fails without modifying the index if the ring is empty. Rings with one
    /// or two points are accepted but will never contain a query point.
    pub fn add(&mut self, id: ExternalId, region: Region) -> Result<RegionIdx> {
        let index = RegionIdx::try_from(self.regions.len())
            .map_err(|_| IndexError::TooManyRegions(self.regions.len()))?;

        let entry = IndexedRegion::new(index, &region).ok_or(IndexError::EmptyRing { id })?;

        if self.fallback.take().is_some() {
            warn!("Region {} added after fallback sort; fallback index discarded", index);
        }

        self.tree.insert(entry);
        self.regions.push(region);
        self.ids.push(id);

        Ok(index)
    }

    /// Number of regions added.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Sort every region vertex for nearest-point fallback lookups.
    ///
    /// Run after the last [`add`](Self::add). Re-running rebuilds the same array.
    pub fn build_fallback_index(&mut self) {
        let fallback = FallbackIndex::build(&self.regions);
        info!(
            "Fallback index built with {} points from {} regions",
            fallback.len(),
            self.regions.len()
        );
        self.fallback = Some(fallback);
    }

    pub fn fallback(&self) -> Option<&FallbackIndex> {
        self.fallback.as_ref()
    }

    pub fn region(&self, index: RegionIdx) -> Option<&Region> {
        self.regions.get(index as usize)
    }

    pub fn external_id(&self, index: RegionIdx) -> Option<ExternalId> {
        self.ids.get(index as usize).copied()
    }

    /// Freeze the current state into an independent, immutable [`Snapshot`].
    pub fn export(&self) -> Result<Snapshot> {
        let snapshot = Snapshot::from_parts(
            self.tree.clone(),
            self.regions.clone(),
            &self.ids,
            self.fallback.clone(),
        )?;
        debug!("Exported snapshot with {} regions", snapshot.len());
        Ok(snapshot)
    }
}

impl Locate for RegionIndex {
    fn search(&self, point: Coord<f64>) -> Lookup {
        resolve(&self.tree, &self.regions, self.fallback.as_ref(), point)
            .into_lookup(|idx| self.ids[idx as usize])
    }
}
