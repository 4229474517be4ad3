//! Dual bond-pad ring detection and per-pin ring classification.
//!
//! Each side gets two rails taken from the extremes of its axis values. The
//! rail nearer the die centre is `inner`:
//!
//! | Side   | Outer    | Inner    |
//! |--------|----------|----------|
//! | left   | `min(x)` | `max(x)` |
//! | right  | `max(x)` | `min(x)` |
//! | top    | `min(y)` | `max(y)` |
//! | bottom | `max(y)` | `min(y)` |
//!
//! A layout counts as double-row when at least [`MIN_SEPARATED_SIDES`] sides
//! have a rail spread of at least the separation threshold.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Rect;
use crate::layout::sides::SideBuckets;
use crate::layout::Side;

/// Minimum number of pins on every side before rails are computed.
pub const MIN_PINS_PER_SIDE: usize = 2;

/// Number of sides that must show two separable rows for a two-ring layout.
pub const MIN_SEPARATED_SIDES: usize = 2;

/// Lower bound of the line-width derived threshold (display units).
pub const LINE_WIDTH_THRESHOLD_FLOOR: f64 = 2.0;

/// Ring membership of a single pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ring {
    /// Row nearer the die centre.
    Inner,
    /// Row nearer the die edge.
    Outer,
    /// Not established (single-row layout or insufficient data).
    #[default]
    Unknown,
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => write!(f, "inner"),
            Self::Outer => write!(f, "outer"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// How the minimum rail separation is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingThreshold {
    /// A fixed separation in display units.
    Fixed(f64),
    /// The current connector line width, floored at [`LINE_WIDTH_THRESHOLD_FLOOR`].
    LineWidth,
}

impl Default for RingThreshold {
    fn default() -> Self {
        Self::Fixed(LINE_WIDTH_THRESHOLD_FLOOR)
    }
}

impl RingThreshold {
    /// Resolves the threshold for the given connector line width.
    #[must_use]
    pub fn resolve(self, line_width: f64) -> f64 {
        match self {
            Self::Fixed(value) => value,
            Self::LineWidth => line_width.max(LINE_WIDTH_THRESHOLD_FLOOR),
        }
    }
}

/// The two candidate row coordinates of one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rail {
    /// Row nearer the die edge.
    pub outer: f64,
    /// Row nearer the die centre.
    pub inner: f64,
}

impl Rail {
    /// Computes the rail of `side` from its axis values.
    ///
    /// Returns `None` with fewer than [`MIN_PINS_PER_SIDE`] values.
    #[must_use]
    pub fn from_values(side: Side, values: &[f64]) -> Option<Self> {
        if values.len() < MIN_PINS_PER_SIDE {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let rail = if side.centre_is_increasing() {
            Self {
                outer: min,
                inner: max,
            }
        } else {
            Self {
                outer: max,
                inner: min,
            }
        };
        Some(rail)
    }

    /// Distance between the two rows.
    #[must_use]
    pub fn spread(&self) -> f64 {
        (self.inner - self.outer).abs()
    }

    /// Returns `true` if the rows are at least `threshold` apart.
    #[must_use]
    pub fn is_separable(&self, threshold: f64) -> bool {
        self.spread() >= threshold
    }

    /// Midpoint between the rows.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.inner + self.outer) / 2.0
    }

    /// Classifies an axis value of a pin on `side` against this rail.
    ///
    /// Left/top: `value >= mid` is inner. Right/bottom: `value <= mid` is
    /// inner. A value exactly on the midpoint is therefore inner on every side.
    #[must_use]
    pub fn classify(&self, side: Side, value: f64) -> Ring {
        let mid = self.midpoint();
        let inner = if side.centre_is_increasing() {
            value >= mid
        } else {
            value <= mid
        };
        if inner {
            Ring::Inner
        } else {
            Ring::Outer
        }
    }
}

/// Rails for all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingRails {
    /// Left side rail.
    pub left: Rail,
    /// Right side rail.
    pub right: Rail,
    /// Top side rail.
    pub top: Rail,
    /// Bottom side rail.
    pub bottom: Rail,
}

impl RingRails {
    /// Computes rails for every side, or `None` if any side has too few pins.
    #[must_use]
    pub fn detect(buckets: &SideBuckets) -> Option<Self> {
        Some(Self {
            left: Rail::from_values(Side::Left, buckets.get(Side::Left))?,
            right: Rail::from_values(Side::Right, buckets.get(Side::Right))?,
            top: Rail::from_values(Side::Top, buckets.get(Side::Top))?,
            bottom: Rail::from_values(Side::Bottom, buckets.get(Side::Bottom))?,
        })
    }

    /// Returns the rail of `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> &Rail {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    /// Number of sides whose rows are at least `threshold` apart.
    #[must_use]
    pub fn separated_sides(&self, threshold: f64) -> usize {
        Side::ALL
            .into_iter()
            .filter(|side| self.get(*side).is_separable(threshold))
            .count()
    }

    /// Returns `true` when enough sides are separable to call the layout double-row.
    #[must_use]
    pub fn has_two_rings(&self, threshold: f64) -> bool {
        self.separated_sides(threshold) >= MIN_SEPARATED_SIDES
    }

    /// Builds the outer and inner reference rectangles.
    #[must_use]
    pub const fn rects(&self) -> RingRects {
        RingRects {
            outer: Rect::new(
                self.left.outer,
                self.top.outer,
                self.right.outer,
                self.bottom.outer,
            ),
            inner: Rect::new(
                self.left.inner,
                self.top.inner,
                self.right.inner,
                self.bottom.inner,
            ),
        }
    }
}

/// Reference rectangles traced through the outer and inner rails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingRects {
    /// Rectangle through the outer rails.
    pub outer: Rect,
    /// Rectangle through the inner rails.
    pub inner: Rect,
}

/// Ring analysis of one pin layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    rails: Option<RingRails>,
    threshold: f64,
    two_rings: bool,
}

impl RingLayout {
    /// Detects rails and decides whether the layout has two rings.
    #[must_use]
    pub fn detect(buckets: &SideBuckets, threshold: f64) -> Self {
        let rails = RingRails::detect(buckets);
        let two_rings = rails.is_some_and(|r| r.has_two_rings(threshold));

        debug!(
            threshold,
            rails_found = rails.is_some(),
            separated_sides = rails.map_or(0, |r| r.separated_sides(threshold)),
            two_rings,
            "Ring detection complete"
        );

        Self {
            rails,
            threshold,
            two_rings,
        }
    }

    /// Returns `true` if the layout was judged double-row.
    #[must_use]
    pub const fn has_two_rings(&self) -> bool {
        self.two_rings
    }

    /// The per-side rails, when every side had enough pins.
    #[must_use]
    pub const fn rails(&self) -> Option<&RingRails> {
        self.rails.as_ref()
    }

    /// The separation threshold in effect.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classifies a pin on `side` with axis coordinate `value`.
    ///
    /// `unknown` for single-ring layouts, and for sides whose own spread is
    /// below the threshold even when the layout as a whole has two rings.
    #[must_use]
    pub fn classify(&self, side: Side, value: f64) -> Ring {
        if !self.two_rings {
            return Ring::Unknown;
        }
        match self.rails.as_ref().map(|r| r.get(side)) {
            Some(rail) if rail.is_separable(self.threshold) => rail.classify(side, value),
            _ => Ring::Unknown,
        }
    }
}
