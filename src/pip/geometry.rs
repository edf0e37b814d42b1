//! Planar geometry kernel: orientation, segment intersection and the
//! crossing-number point-in-ring test.
//!
//! Coordinates are `x` = longitude, `y` = latitude throughout the crate.

use geo_types::Coord;

/// Rotational sense of an ordered triple of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation of the ordered triple `(p, q, r)`.
pub fn orientation(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` falls inside the axis-aligned rectangle spanned by `p` and `r`.
///
/// Only meaningful when the three points are already known to be collinear,
/// in which case it answers "does `q` lie on segment `pr`".
pub fn on_segment(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Whether segment `p1q1` intersects segment `p2q2`.
pub fn segments_intersect(p1: Coord<f64>, q1: Coord<f64>, p2: Coord<f64>, q2: Coord<f64>) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear endpoints touching the other segment
    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// Crossing-number test for an implicitly closed ring.
///
/// A ray is cast from `point` along +x to just past the ring's extent. A point
/// lying exactly on an edge it is collinear with resolves immediately to that
/// edge-membership answer; otherwise an odd number of crossings means inside.
/// Edges are half-open in `y`, so a ray through a vertex counts it once.
/// Rings with fewer than three points contain nothing.
pub fn ring_contains(ring: &[Coord<f64>], point: Coord<f64>) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    // Beyond every ring vertex, but small enough that cross products stay finite
    let far_x = ring.iter().fold(point.x, |acc, c| acc.max(c.x)) + 1.0;
    let extreme = Coord {
        x: far_x,
        y: point.y,
    };

    let mut crossings = 0usize;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];

        if segments_intersect(a, b, point, extreme) {
            if orientation(a, point, b) == Orientation::Collinear {
                return on_segment(a, point, b);
            }
            if (a.y > point.y) != (b.y > point.y) {
                crossings += 1;
            }
        }
    }

    crossings % 2 == 1
}
