//! Die micrometre to display-space coordinate mapping.
//!
//! The die image is calibrated by two anchors: `min` marks the image's
//! lower-left corner and `max` its upper-right corner, both in display space.
//! A die coordinate `(x_um, y_um)` is scaled linearly between them, with the Y
//! axis flipped because die Y grows upwards while display Y grows downwards.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Physical die size in micrometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChipSize {
    /// Die width (um).
    pub width_um: f64,
    /// Die height (um).
    pub height_um: f64,
}

impl ChipSize {
    /// Creates a new chip size.
    #[must_use]
    pub const fn new(width_um: f64, height_um: f64) -> Self {
        Self {
            width_um,
            height_um,
        }
    }

    /// Returns `true` when both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width_um.is_finite()
            && self.height_um.is_finite()
            && self.width_um > 0.0
            && self.height_um > 0.0
    }

    /// Returns the on-screen image size for this die at the given density.
    #[must_use]
    pub fn pixel_size(&self, px_per_um_x: f64, px_per_um_y: f64) -> (f64, f64) {
        (self.width_um * px_per_um_x, self.height_um * px_per_um_y)
    }
}

/// Per-edge inward offsets applied to the image rectangle before calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeOffsets {
    /// Left edge offset.
    #[serde(default)]
    pub left: f64,
    /// Right edge offset.
    #[serde(default)]
    pub right: f64,
    /// Top edge offset.
    #[serde(default)]
    pub top: f64,
    /// Bottom edge offset.
    #[serde(default)]
    pub bottom: f64,
}

/// The two display-space calibration anchors of the die image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationAnchors {
    /// Display position of the die's lower-left corner.
    pub min: Point,
    /// Display position of the die's upper-right corner.
    pub max: Point,
}

impl CalibrationAnchors {
    /// Creates anchors from explicit points.
    #[must_use]
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Derives anchors from the displayed image rectangle.
    ///
    /// `min` is the bottom-left corner and `max` the top-right corner, each
    /// moved inwards by the corresponding edge offset.
    #[must_use]
    pub fn from_image_rect(rect: &Rect, offsets: &EdgeOffsets) -> Self {
        Self {
            min: Point::new(rect.left + offsets.left, rect.bottom - offsets.bottom),
            max: Point::new(rect.right - offsets.right, rect.top + offsets.top),
        }
    }
}

/// Maps die coordinates into display space.
///
/// Construction validates the inputs once; a mapper only exists when both the
/// anchors and a positive chip size are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: Point,
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateMapper {
    /// Creates a mapper, or `None` if anchors are unset or the chip size is not positive.
    #[must_use]
    pub fn new(anchors: Option<&CalibrationAnchors>, chip: Option<&ChipSize>) -> Option<Self> {
        let anchors = anchors?;
        let chip = chip.filter(|c| c.is_valid())?;

        let selection_width = (anchors.max.x - anchors.min.x).abs();
        let selection_height = (anchors.min.y - anchors.max.y).abs();

        Some(Self {
            origin: anchors.min,
            scale_x: selection_width / chip.width_um,
            scale_y: selection_height / chip.height_um,
        })
    }

    /// Maps a die coordinate (um) to a display point.
    #[must_use]
    pub fn map(&self, x_um: f64, y_um: f64) -> Point {
        Point::new(
            x_um.mul_add(self.scale_x, self.origin.x),
            (-y_um).mul_add(self.scale_y, self.origin.y),
        )
    }

    /// Horizontal scale factor (display units per um).
    #[must_use]
    pub const fn scale_x(&self) -> f64 {
        self.scale_x
    }

    /// Vertical scale factor (display units per um).
    #[must_use]
    pub const fn scale_y(&self) -> f64 {
        self.scale_y
    }
}

/// Maps a single die coordinate, returning `None` when mapping is undefined.
#[must_use]
pub fn map_to_display(
    x_um: f64,
    y_um: f64,
    chip: Option<&ChipSize>,
    anchors: Option<&CalibrationAnchors>,
) -> Option<Point> {
    CoordinateMapper::new(anchors, chip).map(|m| m.map(x_um, y_um))
}
