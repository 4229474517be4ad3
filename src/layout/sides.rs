//! Nearest-edge side classification.

use crate::geometry::Point;
use crate::layout::Side;

/// Default tolerance when comparing edge distances.
pub const DEFAULT_SIDE_EPSILON: f64 = 1e-4;

/// Axis-aligned bounds of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X.
    pub min_x: f64,
    /// Maximum X.
    pub max_x: f64,
    /// Minimum Y.
    pub min_y: f64,
    /// Maximum Y.
    pub max_y: f64,
}

impl BoundingBox {
    /// Computes the bounds of `points`, or `None` if there are none.
    #[must_use]
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.iter().fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Distance from `point` to the bounding edge of `side`.
    #[must_use]
    pub fn edge_distance(&self, side: Side, point: Point) -> f64 {
        match side {
            Side::Left => (point.x - self.min_x).abs(),
            Side::Right => (self.max_x - point.x).abs(),
            Side::Top => (point.y - self.min_y).abs(),
            Side::Bottom => (self.max_y - point.y).abs(),
        }
    }

    /// Returns the nearest edge to `point`.
    ///
    /// The first side in [`Side::ALL`] order whose distance is within
    /// `epsilon` of the minimum wins.
    #[must_use]
    pub fn nearest_side(&self, point: Point, epsilon: f64) -> Side {
        let distances = Side::ALL.map(|side| self.edge_distance(side, point));
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        Side::ALL
            .into_iter()
            .find(|side| distances[side.index()] <= min + epsilon)
            .unwrap_or(Side::Left)
    }
}

/// Assigns a side to every point, in input order.
///
/// Returns an empty vector for an empty input.
#[must_use]
pub fn classify_sides(points: &[Point], epsilon: f64) -> Vec<Side> {
    let Some(bounds) = BoundingBox::of(points) else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| bounds.nearest_side(*p, epsilon))
        .collect()
}

/// Axis coordinates of pins grouped by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideBuckets {
    values: [Vec<f64>; 4],
}

impl SideBuckets {
    /// Creates empty buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an axis value to `side`.
    pub fn push(&mut self, side: Side, value: f64) {
        self.values[side.index()].push(value);
    }

    /// Returns the values collected for `side`.
    #[must_use]
    pub fn get(&self, side: Side) -> &[f64] {
        &self.values[side.index()]
    }

    /// Buckets mapped points by their assigned side, using the side's axis.
    #[must_use]
    pub fn from_points(points: &[Point], sides: &[Side]) -> Self {
        points
            .iter()
            .zip(sides)
            .map(|(p, side)| (*side, side.axis_value(*p)))
            .collect()
    }
}

impl FromIterator<(Side, f64)> for SideBuckets {
    fn from_iter<I: IntoIterator<Item = (Side, f64)>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for (side, value) in iter {
            buckets.push(side, value);
        }
        buckets
    }
}
