//! Sorted vertex array for the nearest-point fallback.
//!
//! Every vertex of every region is flattened into an [`IndexedPoint`] and
//! sorted by `x`, then `y`. A lookup binary-searches the query's position and
//! scans outward in both directions, abandoning a direction once the `x` gap
//! alone exceeds the best distance found so far.

use std::cmp::Ordering;

use geo_types::Coord;
use rayon::prelude::*;

use super::{Region, RegionIdx};

/// Maximum distance, in coordinate units, for a fallback match.
pub const FALLBACK_RADIUS: f64 = 10.0;

/// A region vertex tagged with the internal index of its owning region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub coord: Coord<f64>,
    pub region: RegionIdx,
}

impl IndexedPoint {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.coord
            .x
            .total_cmp(&other.coord.x)
            .then_with(|| self.coord.y.total_cmp(&other.coord.y))
            .then_with(|| self.region.cmp(&other.region))
    }
}

/// Result of a nearest-point scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    pub region: RegionIdx,
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackIndex {
    points: Vec<IndexedPoint>,
}

impl FallbackIndex {
    /// Flatten and sort the vertices of `regions`. Region `i` gets index `i`.
    pub fn build(regions: &[Region]) -> Self {
        let mut points: Vec<IndexedPoint> = regions
            .iter()
            .enumerate()
            .flat_map(|(i, region)| {
                region.points().iter().map(move |&coord| IndexedPoint {
                    coord,
                    region: i as RegionIdx,
                })
            })
            .collect();

        points.par_sort_by(IndexedPoint::cmp_key);

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[IndexedPoint] {
        &self.points
    }

    /// Closest vertex to `point` no farther than `radius`.
    ///
    /// Equidistant candidates resolve to whichever the scan meets first, which
    /// is fixed for a given array.
    pub fn closest(&self, point: Coord<f64>, radius: f64) -> Option<NearestPoint> {
        let start = self.points.partition_point(|ip| {
            ip.coord
                .x
                .total_cmp(&point.x)
                .then_with(|| ip.coord.y.total_cmp(&point.y))
                == Ordering::Less
        });

        let mut best: Option<NearestPoint> = None;
        let mut limit = radius;

        let mut consider = |ip: &IndexedPoint| -> bool {
            if (ip.coord.x - point.x).abs() > limit {
                return false;
            }
            let distance = (ip.coord.x - point.x).hypot(ip.coord.y - point.y);
            let better = match best {
                Some(b) => distance < b.distance,
                None => distance <= limit,
            };
            if better {
                best = Some(NearestPoint {
                    region: ip.region,
                    distance,
                });
                limit = distance;
            }
            true
        };

        for ip in &self.points[start..] {
            if !consider(ip) {
                break;
            }
        }
        for ip in self.points[..start].iter().rev() {
            if !consider(ip) {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn sample() -> Vec<Region> {
        vec![
            Region::from_pairs(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]),
            Region::from_pairs(&[[20.0, 0.0], [30.0, 0.0], [30.0, 10.0], [20.0, 10.0]]),
            Region::from_pairs(&[[10.0, 0.0], [12.0, 3.0], [10.0, 5.0]]),
        ]
    }

    #[test]
    fn test_sorted_by_x_then_y() {
        let index = FallbackIndex::build(&sample());
        assert_eq!(index.len(), 11);
        for pair in index.points().windows(2) {
            let (a, b) = (pair[0].coord, pair[1].coord);
            assert!(a.x < b.x || (a.x == b.x && a.y <= b.y));
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let regions = sample();
        let once = FallbackIndex::build(&regions);
        let twice = FallbackIndex::build(&regions);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_closest_picks_owner_of_nearest_vertex() {
        let index = FallbackIndex::build(&sample());

        let hit = index.closest(c(31.0, 11.0), FALLBACK_RADIUS).unwrap();
        assert_eq!(hit.region, 1);
        assert!((hit.distance - 2f64.sqrt()).abs() < 1e-12);

        let hit = index.closest(c(13.0, 3.0), FALLBACK_RADIUS).unwrap();
        assert_eq!(hit.region, 2);
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_scans_left_of_insertion_point() {
        let index = FallbackIndex::build(&sample());
        // Nearest vertex (0, 10) sorts before the query
        let hit = index.closest(c(0.5, 11.0), FALLBACK_RADIUS).unwrap();
        assert_eq!(hit.region, 0);
        assert!((hit.distance - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_closest_respects_radius() {
        let index = FallbackIndex::build(&sample());
        assert!(index.closest(c(-10.0, 25.0), FALLBACK_RADIUS).is_none());
        assert!(index.closest(c(100.0, 100.0), FALLBACK_RADIUS).is_none());

        // Exactly on the radius still matches
        let hit = index.closest(c(-10.0, 0.0), FALLBACK_RADIUS).unwrap();
        assert_eq!(hit.distance, 10.0);
    }

    #[test]
    fn test_closest_on_empty_index() {
        let index = FallbackIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.closest(c(0.0, 0.0), FALLBACK_RADIUS).is_none());
    }
}
