//! Package outline: the set of lead label boxes around the die.
//!
//! The standard outline has 74 leads: 21 on each vertical side and 16 on each
//! horizontal side, spaced at [`LEAD_PITCH`]. Letters mark leads that are not
//! numbered package pins (corner and tie-bar leads).

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::layout::Side;
use crate::package::{LabelBox, LabelRegistry};

/// Lead labels on the left side, top to bottom.
pub const LEFT_LABELS: [&str; 21] = [
    "A", "B", "2", "3", "6", "7", "8", "9", "11", "14", "15", "17", "18", "19", "22", "23", "24",
    "25", "28", "C", "D",
];

/// Lead labels on the right side, top to bottom.
pub const RIGHT_LABELS: [&str; 21] = [
    "J", "I", "79", "77", "75", "74", "73", "72", "69", "68", "65", "63", "61", "60", "59", "58",
    "57", "56", "53", "H", "G",
];

/// Lead labels on the top side, left to right.
pub const TOP_LABELS: [&str; 16] = [
    "P", "O", "N", "96", "95", "94", "93", "92", "91", "87", "85", "83", "81", "M", "L", "K",
];

/// Lead labels on the bottom side, left to right.
pub const BOTTOM_LABELS: [&str; 16] = [
    "E", "31", "32", "33", "35", "36", "37", "40", "41", "44", "45", "46", "47", "49", "50", "F",
];

/// Distance between neighbouring leads.
pub const LEAD_PITCH: f64 = 33.0;

/// Long dimension of a lead box.
pub const BOX_LENGTH: f64 = 60.0;

/// Short dimension of a lead box.
pub const BOX_BREADTH: f64 = 22.0;

// Box placement of the standard outline
const LEFT_BOX_X: f64 = 35.0;
const RIGHT_BOX_X: f64 = 655.0;
const VERTICAL_Y0: f64 = 125.0;
const TOP_BOX_Y: f64 = 35.0;
const BOTTOM_BOX_Y: f64 = 815.0;
const HORIZONTAL_X0: f64 = 150.0;

/// A package outline made of lead label boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageOutline {
    /// Lead boxes in layout order.
    pub leads: Vec<LabelBox>,
}

impl Default for PackageOutline {
    fn default() -> Self {
        Self::standard()
    }
}

impl PackageOutline {
    /// The standard 74-lead outline.
    #[must_use]
    pub fn standard() -> Self {
        let mut leads = Vec::with_capacity(74);

        for (i, label) in (0u32..).zip(LEFT_LABELS.iter()) {
            let y = LEAD_PITCH.mul_add(f64::from(i), VERTICAL_Y0);
            let rect = Rect::from_origin_size(LEFT_BOX_X, y, BOX_LENGTH, BOX_BREADTH);
            leads.push(LabelBox::new(*label, Side::Left, rect));
        }
        for (i, label) in (0u32..).zip(RIGHT_LABELS.iter()) {
            let y = LEAD_PITCH.mul_add(f64::from(i), VERTICAL_Y0);
            let rect = Rect::from_origin_size(RIGHT_BOX_X, y, BOX_LENGTH, BOX_BREADTH);
            leads.push(LabelBox::new(*label, Side::Right, rect));
        }
        for (i, label) in (0u32..).zip(TOP_LABELS.iter()) {
            let x = LEAD_PITCH.mul_add(f64::from(i), HORIZONTAL_X0);
            let rect = Rect::from_origin_size(x, TOP_BOX_Y, BOX_BREADTH, BOX_LENGTH);
            leads.push(LabelBox::new(*label, Side::Top, rect));
        }
        for (i, label) in (0u32..).zip(BOTTOM_LABELS.iter()) {
            let x = LEAD_PITCH.mul_add(f64::from(i), HORIZONTAL_X0);
            let rect = Rect::from_origin_size(x, BOTTOM_BOX_Y, BOX_BREADTH, BOX_LENGTH);
            leads.push(LabelBox::new(*label, Side::Bottom, rect));
        }

        Self { leads }
    }

    /// The free area enclosed by the inward-facing edges of all lead boxes.
    ///
    /// Returns `None` unless every side has at least one lead.
    #[must_use]
    pub fn inner_frame(&self) -> Option<Rect> {
        let edge = |side: Side, pick: fn(&Rect) -> f64, inward_is_max: bool| {
            let values = self.leads.iter().filter(|l| l.side == side).map(|l| pick(&l.rect));
            if inward_is_max {
                values.reduce(f64::max)
            } else {
                values.reduce(f64::min)
            }
        };

        Some(Rect::new(
            edge(Side::Left, |r| r.right, true)?,
            edge(Side::Top, |r| r.bottom, true)?,
            edge(Side::Right, |r| r.left, false)?,
            edge(Side::Bottom, |r| r.top, false)?,
        ))
    }

    /// Builds the label lookup for this outline.
    #[must_use]
    pub fn registry(&self) -> LabelRegistry {
        LabelRegistry::from_boxes(self.leads.iter().cloned())
    }
}
