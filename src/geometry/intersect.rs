//! Planar segment intersection for bond wire crossing checks.
//!
//! Uses the orientation-sign test with a small tolerance, differing from the
//! textbook predicate in two ways:
//!
//! - Segments that share an endpoint never intersect.
//! - Collinear segments that overlap (or touch end-to-body) do intersect.

use crate::geometry::{Point, Segment};

/// Tolerance used for endpoint equality and orientation signs.
pub const INTERSECTION_EPSILON: f64 = 1e-4;

/// Signed area of the triangle `(a, b, c)`, doubled.
///
/// Positive when `c` lies to the left of `a -> b` in a Y-up frame.
#[must_use]
pub fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x).mul_add(c.y - a.y, -((b.y - a.y) * (c.x - a.x)))
}

/// Returns `true` if `p` lies on segment `a -> b` (within tolerance).
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let eps = INTERSECTION_EPSILON;
    a.x.min(b.x) - eps <= p.x
        && p.x <= a.x.max(b.x) + eps
        && a.y.min(b.y) - eps <= p.y
        && p.y <= a.y.max(b.y) + eps
        && orientation(a, b, p).abs() <= eps
}

fn strictly_opposite(o1: f64, o2: f64) -> bool {
    (o1 > INTERSECTION_EPSILON && o2 < -INTERSECTION_EPSILON)
        || (o1 < -INTERSECTION_EPSILON && o2 > INTERSECTION_EPSILON)
}

/// Tests whether two connector segments intersect.
///
/// Symmetric in its arguments.
#[must_use]
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    if a.shares_endpoint(b, INTERSECTION_EPSILON) {
        return false;
    }

    let o1 = orientation(a.from, a.to, b.from);
    let o2 = orientation(a.from, a.to, b.to);
    let o3 = orientation(b.from, b.to, a.from);
    let o4 = orientation(b.from, b.to, a.to);

    if strictly_opposite(o1, o2) && strictly_opposite(o3, o4) {
        return true;
    }

    // Collinear or touching cases
    if o1.abs() <= INTERSECTION_EPSILON
        && (on_segment(a.from, a.to, b.from) || on_segment(a.from, a.to, b.to))
    {
        return true;
    }
    if o3.abs() <= INTERSECTION_EPSILON
        && (on_segment(b.from, b.to, a.from) || on_segment(b.from, b.to, a.to))
    {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn crossing_segments_intersect_both_ways() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 10.0, 10.0, 0.0);
        assert!(segments_intersect(&a, &b));
        assert!(segments_intersect(&b, &a));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(0.0, 5.0, 10.0, 5.0);
        assert!(!segments_intersect(&a, &b));
    }

    #[test]
    fn shared_endpoint_is_not_a_crossing() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(10.0, 10.0, 20.0, 0.0);
        assert!(!segments_intersect(&a, &b));
    }

    #[test]
    fn collinear_overlap_is_a_crossing() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(5.0, 0.0, 15.0, 0.0);
        assert!(segments_intersect(&a, &b));
        assert!(segments_intersect(&b, &a));
    }

    #[test]
    fn collinear_containment_is_a_crossing() {
        let outer = seg(0.0, 0.0, 20.0, 0.0);
        let inner = seg(5.0, 0.0, 10.0, 0.0);
        assert!(segments_intersect(&outer, &inner));
        assert!(segments_intersect(&inner, &outer));
    }

    #[test]
    fn collinear_disjoint_is_not_a_crossing() {
        let a = seg(0.0, 0.0, 4.0, 0.0);
        let b = seg(6.0, 0.0, 10.0, 0.0);
        assert!(!segments_intersect(&a, &b));
    }

    #[test]
    fn near_miss_is_not_a_crossing() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(5.0, 1.0, 5.0, 10.0);
        assert!(!segments_intersect(&a, &b));
    }

    #[test]
    fn orientation_sign() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(orientation(a, b, Point::new(5.0, 1.0)) > 0.0);
        assert!(orientation(a, b, Point::new(5.0, -1.0)) < 0.0);
        assert!(orientation(a, b, Point::new(20.0, 0.0)).abs() < f64::EPSILON);
    }
}
