//! Immutable, thread-shareable export of a [`RegionIndex`](super::RegionIndex).

use geo_types::Coord;
use rayon::prelude::*;
use rstar::RTree;

use super::nearest::FallbackIndex;
use super::resolve::{resolve, IndexedRegion, Locate, Lookup};
use super::{ExternalId, Region, RegionIdx, SnapshotId};
use crate::error::{IndexError, Result};

/// Read-only region index.
///
/// Owns its own copies of the tree, the regions, the id mapping and the
/// fallback array, so it stays valid however the originating builder is later
/// mutated or dropped. Every query takes `&self`; wrap it in an `Arc` and query
/// from as many threads as needed.
#[derive(Debug, Clone)]
pub struct Snapshot {
    tree: RTree<IndexedRegion>,
    regions: Vec<Region>,
    ids: Vec<SnapshotId>,
    fallback: Option<FallbackIndex>,
}

impl Snapshot {
    pub(crate) fn from_parts(
        tree: RTree<IndexedRegion>,
        regions: Vec<Region>,
        ids: &[ExternalId],
        fallback: Option<FallbackIndex>,
    ) -> Result<Self> {
        let ids = ids
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                SnapshotId::try_from(id).map_err(|_| IndexError::IdOutOfRange {
                    id,
                    index: index as RegionIdx,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tree,
            regions,
            ids,
            fallback,
        })
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of entries held by the spatial tree.
    pub fn element_count(&self) -> usize {
        self.tree.size()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn external_id(&self, index: RegionIdx) -> Option<ExternalId> {
        self.ids.get(index as usize).map(|&id| ExternalId::from(id))
    }

    pub fn region(&self, index: RegionIdx) -> Option<&Region> {
        self.regions.get(index as usize)
    }

    /// Resolve many points in parallel; results keep the input order.
    pub fn search_many(&self, points: &[Coord<f64>]) -> Vec<Lookup> {
        points.par_iter().map(|&p| self.search(p)).collect()
    }

    /// Check that `other` has the same id mapping and element count.
    ///
    /// This is a fidelity check for round trips, not a polygon-by-polygon
    /// comparison.
    pub fn ensure_equal(&self, other: &Snapshot) -> Result<()> {
        if self.ids != other.ids {
            return Err(IndexError::Mismatch(format!(
                "id mappings differ ({} vs {} entries)",
                self.ids.len(),
                other.ids.len()
            )));
        }

        let (want, have) = (self.element_count(), other.element_count());
        if want != have {
            return Err(IndexError::Mismatch(format!(
                "element count want: {} have: {}",
                want, have
            )));
        }

        Ok(())
    }
}

impl Locate for Snapshot {
    fn search(&self, point: Coord<f64>) -> Lookup {
        resolve(&self.tree, &self.regions, self.fallback.as_ref(), point)
            .into_lookup(|idx| ExternalId::from(self.ids[idx as usize]))
    }
}
