//! A single polygonal region: one implicitly closed ring.

use geo::{BoundingRect, Coord, LineString, Rect};

use super::geometry::ring_contains;

/// An ordered ring of coordinates (`x` = lon, `y` = lat).
///
/// The ring does not need a closing duplicate of its first point. Rings with
/// fewer than three points are legal but never contain anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    ring: LineString<f64>,
}

impl Region {
    pub fn new(points: Vec<Coord<f64>>) -> Self {
        Self {
            ring: LineString::new(points),
        }
    }

    /// Build a region from `[x, y]` pairs as stored in a catalog.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        Self::new(pairs.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    pub fn points(&self) -> &[Coord<f64>] {
        &self.ring.0
    }

    pub fn len(&self) -> usize {
        self.ring.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.0.is_empty()
    }

    /// Per-axis extrema of the ring; `None` for an empty ring.
    pub fn bbox(&self) -> Option<Rect<f64>> {
        self.ring.bounding_rect()
    }

    /// Exact point-in-region test.
    pub fn contains(&self, point: Coord<f64>) -> bool {
        ring_contains(self.points(), point)
    }
}

impl From<Vec<Coord<f64>>> for Region {
    fn from(points: Vec<Coord<f64>>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_encloses_every_point() {
        let regions = [
            Region::from_pairs(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]),
            Region::from_pairs(&[[-122.3, 37.7], [-122.1, 37.9], [-121.9, 37.6]]),
            Region::from_pairs(&[[3.5, -2.0], [-7.25, 4.0], [1.0, 1.0], [9.0, -8.5], [0.0, 0.0]]),
            Region::from_pairs(&[[4.0, 4.0]]),
        ];

        for region in &regions {
            let bbox = region.bbox().expect("non-empty ring has a bbox");
            assert!(bbox.min().x <= bbox.max().x);
            assert!(bbox.min().y <= bbox.max().y);
            for p in region.points() {
                assert!(bbox.min().x <= p.x && p.x <= bbox.max().x);
                assert!(bbox.min().y <= p.y && p.y <= bbox.max().y);
            }
        }
    }

    #[test]
    fn test_degenerate_bbox() {
        let region = Region::from_pairs(&[[4.0, 2.0]]);
        let bbox = region.bbox().unwrap();
        assert_eq!(bbox.min(), bbox.max());
        assert!(!region.contains(Coord { x: 4.0, y: 2.0 }));
    }

    #[test]
    fn test_empty_ring_has_no_bbox() {
        let region = Region::new(vec![]);
        assert!(region.is_empty());
        assert!(region.bbox().is_none());
    }

    #[test]
    fn test_contains_delegates_to_ring_test() {
        let region = Region::from_pairs(&[[0.0, 0.0], [5.0, 5.0], [5.0, 0.0]]);
        assert!(region.contains(Coord { x: 3.0, y: 3.0 }));
        assert!(!region.contains(Coord { x: 1.0, y: 4.0 }));
    }
}
