//! Pin layout analysis: package side and bond-pad ring assignment.
//!
//! # Pipeline
//!
//! ```text
//! mapped points ──▶ sides::classify_sides ──▶ SideBuckets
//!                                                  │
//!                                                  ▼
//!                                   rings::RingLayout::detect
//!                                                  │
//!                                                  ▼
//!                                   RingLayout::classify(side, value)
//! ```
//!
//! Side assignment is purely data-driven (bounding box of the mapped pin
//! cloud), so it does not depend on where the package lead labels are drawn.

pub mod rings;
pub mod sides;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

pub use rings::{Rail, Ring, RingLayout, RingRails, RingRects, RingThreshold, MIN_PINS_PER_SIDE};
pub use sides::{classify_sides, BoundingBox, SideBuckets, DEFAULT_SIDE_EPSILON};

/// One of the four package edges.
///
/// Declaration order is the tie-break priority used by side classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left edge (smallest X).
    Left,
    /// Right edge (largest X).
    Right,
    /// Top edge (smallest display Y).
    Top,
    /// Bottom edge (largest display Y).
    Bottom,
}

impl Side {
    /// All sides in tie-break priority order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Index into per-side arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Top => 2,
            Self::Bottom => 3,
        }
    }

    /// Returns `true` for the left and right edges, whose rows run vertically.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// The coordinate that separates rows on this side: X for left/right, Y for top/bottom.
    #[must_use]
    pub const fn axis_value(self, point: Point) -> f64 {
        if self.is_vertical() {
            point.x
        } else {
            point.y
        }
    }

    /// Returns `true` when larger axis values are closer to the die centre.
    #[must_use]
    pub const fn centre_is_increasing(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_value_by_side() {
        let p = Point::new(3.0, 7.0);
        assert!((Side::Left.axis_value(p) - 3.0).abs() < f64::EPSILON);
        assert!((Side::Right.axis_value(p) - 3.0).abs() < f64::EPSILON);
        assert!((Side::Top.axis_value(p) - 7.0).abs() < f64::EPSILON);
        assert!((Side::Bottom.axis_value(p) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn indices_are_distinct() {
        let mut seen = [false; 4];
        for side in Side::ALL {
            assert!(!seen[side.index()]);
            seen[side.index()] = true;
        }
    }

    #[test]
    fn side_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Bottom).unwrap(), "\"bottom\"");
        assert_eq!(Side::Left.to_string(), "left");
    }
}
