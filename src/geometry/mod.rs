//! Display-space geometry primitives.
//!
//! All coordinates in this module are display units with the Y axis growing
//! downwards, matching the drawing surface the scene is rendered onto. Die
//! coordinates (micrometres, Y up) only exist at the input of
//! [`mapping::CoordinateMapper`].

pub mod intersect;
pub mod mapping;

use serde::{Deserialize, Serialize};

pub use intersect::{segments_intersect, INTERSECTION_EPSILON};
pub use mapping::{CalibrationAnchors, ChipSize, CoordinateMapper, EdgeOffsets};

/// A 2D point in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (grows to the right).
    pub x: f64,
    /// Y coordinate (grows downwards).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are within `eps` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle in display space.
///
/// `top` is numerically smaller than `bottom` for a non-degenerate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge X.
    pub left: f64,
    /// Top edge Y.
    pub top: f64,
    /// Right edge X.
    pub right: f64,
    /// Bottom edge Y.
    pub bottom: f64,
}

impl Rect {
    /// Creates a rectangle from its edges.
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Creates a `width` x `height` rectangle centred inside `frame`.
    #[must_use]
    pub fn centred_in(frame: &Self, width: f64, height: f64) -> Self {
        let centre = frame.centre();
        Self::from_origin_size(
            centre.x - width / 2.0,
            centre.y - height / 2.0,
            width,
            height,
        )
    }

    /// Returns the rectangle width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Returns the rectangle height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Returns the centre point.
    #[must_use]
    pub fn centre(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// A straight line segment between two display points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Returns `true` if any endpoint of `self` coincides with any endpoint of `other`.
    #[must_use]
    pub fn shares_endpoint(&self, other: &Self, eps: f64) -> bool {
        self.from.approx_eq(&other.from, eps)
            || self.from.approx_eq(&other.to, eps)
            || self.to.approx_eq(&other.from, eps)
            || self.to.approx_eq(&other.to, eps)
    }
}
