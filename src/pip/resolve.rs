//! Point resolution shared by the builder and the snapshot.

use geo_types::Coord;
use rstar::{RTree, RTreeObject, AABB};

use super::nearest::{FallbackIndex, FALLBACK_RADIUS};
use super::{ExternalId, Region, RegionIdx, NOT_FOUND};

/// R-tree entry: a region's bounding box and its internal index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRegion {
    pub index: RegionIdx,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedRegion {
    pub fn new(index: RegionIdx, region: &Region) -> Option<Self> {
        let rect = region.bbox()?;
        Some(Self {
            index,
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }
}

/// Outcome of a point lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// A region contains the point.
    Contained { id: ExternalId },
    /// No region contains the point; `id` owns the closest vertex.
    Nearest { id: ExternalId, distance: f64 },
    NotFound,
}

impl Lookup {
    /// External id of the match, or [`NOT_FOUND`].
    pub fn id(&self) -> ExternalId {
        match self {
            Lookup::Contained { id } | Lookup::Nearest { id, .. } => *id,
            Lookup::NotFound => NOT_FOUND,
        }
    }

    /// Distance to the matched vertex; zero for containment and misses.
    pub fn distance(&self) -> f64 {
        match self {
            Lookup::Nearest { distance, .. } => *distance,
            _ => 0.0,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Lookup::NotFound)
    }

    /// Short label for the kind of match.
    pub fn kind(&self) -> &'static str {
        match self {
            Lookup::Contained { .. } => "contained",
            Lookup::Nearest { .. } => "nearest",
            Lookup::NotFound => "not_found",
        }
    }
}

/// Anything that can answer point lookups.
pub trait Locate {
    fn search(&self, point: Coord<f64>) -> Lookup;

    fn search_lon_lat(&self, lon: f64, lat: f64) -> Lookup {
        self.search(Coord { x: lon, y: lat })
    }
}

/// Internal-index form of a [`Lookup`], before the id mapping is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolution {
    Contained(RegionIdx),
    Nearest(RegionIdx, f64),
    Miss,
}

impl Resolution {
    pub(crate) fn into_lookup(self, id_of: impl Fn(RegionIdx) -> ExternalId) -> Lookup {
        match self {
            Resolution::Contained(idx) => Lookup::Contained { id: id_of(idx) },
            Resolution::Nearest(idx, distance) => Lookup::Nearest {
                id: id_of(idx),
                distance,
            },
            Resolution::Miss => Lookup::NotFound,
        }
    }
}

/// Candidate filtering, exact containment, then the nearest-vertex fallback.
///
/// Among overlapping regions the first one the tree yields wins.
pub(crate) fn resolve(
    tree: &RTree<IndexedRegion>,
    regions: &[Region],
    fallback: Option<&FallbackIndex>,
    point: Coord<f64>,
) -> Resolution {
    let query_envelope = AABB::from_point([point.x, point.y]);

    let contained = tree
        .locate_in_envelope_intersecting(&query_envelope)
        .find(|ir| regions[ir.index as usize].contains(point));

    if let Some(ir) = contained {
        return Resolution::Contained(ir.index);
    }

    match fallback.and_then(|f| f.closest(point, FALLBACK_RADIUS)) {
        Some(nearest) => Resolution::Nearest(nearest.region, nearest.distance),
        None => Resolution::Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_sentinel() {
        assert_eq!(Lookup::NotFound.id(), NOT_FOUND);
        assert_eq!(Lookup::NotFound.distance(), 0.0);
        assert!(!Lookup::NotFound.is_found());

        let hit = Lookup::Contained { id: 7 };
        assert_eq!((hit.id(), hit.distance()), (7, 0.0));

        let near = Lookup::Nearest { id: 9, distance: 2.5 };
        assert_eq!((near.id(), near.distance()), (9, 2.5));
        assert_eq!(near.kind(), "nearest");
    }

    #[test]
    fn test_resolve_without_regions() {
        let tree = RTree::new();
        assert_eq!(resolve(&tree, &[], None, Coord { x: 1.0, y: 1.0 }), Resolution::Miss);
    }
}
