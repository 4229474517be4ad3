//! Package lead labels and their geometry.
//!
//! Every package lead is drawn as a label box on one side of the diagram. A
//! bond wire runs from the pin's mapped position to the box's inner anchor,
//! which is the midpoint of the box edge facing the die.
//!
//! Pins are matched to boxes by label: first by exact text, then by the
//! normalised form (whitespace removed, upper case).

pub mod outline;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::layout::Side;

pub use outline::PackageOutline;

/// Normalises a lead label for matching.
///
/// Removes all whitespace (including non-breaking spaces) and upper-cases.
#[must_use]
pub fn normalise_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// A package lead label box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    /// Lead label as printed on the package diagram.
    pub label: String,
    /// Package side the lead sits on.
    pub side: Side,
    /// Box rectangle in display space.
    pub rect: Rect,
}

impl LabelBox {
    /// Creates a new label box.
    #[must_use]
    pub fn new(label: impl Into<String>, side: Side, rect: Rect) -> Self {
        Self {
            label: label.into(),
            side,
            rect,
        }
    }

    /// Midpoint of the box edge that faces the die.
    #[must_use]
    pub fn inner_anchor(&self) -> Point {
        let centre = self.rect.centre();
        match self.side {
            Side::Left => Point::new(self.rect.right, centre.y),
            Side::Right => Point::new(self.rect.left, centre.y),
            Side::Top => Point::new(centre.x, self.rect.bottom),
            Side::Bottom => Point::new(centre.x, self.rect.top),
        }
    }
}

/// Lookup of label boxes by lead label.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    boxes: IndexMap<String, LabelBox>,
    normalised: HashMap<String, String>,
}

impl LabelRegistry {
    /// Builds a registry from label boxes. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_boxes(boxes: impl IntoIterator<Item = LabelBox>) -> Self {
        let mut registry = Self::default();
        for label_box in boxes {
            registry
                .normalised
                .insert(normalise_label(&label_box.label), label_box.label.clone());
            registry.boxes.insert(label_box.label.clone(), label_box);
        }
        registry
    }

    /// Finds the box for a pin number: exact label first, then normalised.
    #[must_use]
    pub fn lookup(&self, pin_no: &str) -> Option<&LabelBox> {
        self.boxes.get(pin_no).or_else(|| {
            self.normalised
                .get(&normalise_label(pin_no))
                .and_then(|label| self.boxes.get(label))
        })
    }

    /// Iterates boxes in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelBox> {
        self.boxes.values()
    }

    /// Number of registered boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if no boxes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// A physical package corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Lower-left corner.
    LowerLeft,
    /// Lower-right corner.
    LowerRight,
    /// Upper-left corner.
    UpperLeft,
    /// Upper-right corner.
    UpperRight,
}

/// The two leads flanking one package corner. Only one may carry a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerPair {
    /// Which corner.
    pub corner: Corner,
    /// Labels of the two flanking leads.
    pub labels: [&'static str; 2],
}

/// Corner lead pairs of the standard outline.
pub const CORNER_PAIRS: [CornerPair; 4] = [
    CornerPair {
        corner: Corner::LowerLeft,
        labels: ["D", "E"],
    },
    CornerPair {
        corner: Corner::LowerRight,
        labels: ["F", "G"],
    },
    CornerPair {
        corner: Corner::UpperLeft,
        labels: ["A", "P"],
    },
    CornerPair {
        corner: Corner::UpperRight,
        labels: ["K", "J"],
    },
];

/// Fill category of a lead box, derived from the assigned pin name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadFill {
    /// No pin assigned.
    Empty,
    /// Ground net (`VSS`).
    Ground,
    /// Supply net (`VDD` / `VDP`).
    Power,
    /// Name containing `Q`.
    Signal,
    /// Any other assigned pin.
    Plain,
}

impl LeadFill {
    /// Classifies a lead by the name of the pin wired to it.
    #[must_use]
    pub fn for_pin_name(name: Option<&str>) -> Self {
        let name = name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            Self::Empty
        } else if name.contains("VSS") {
            Self::Ground
        } else if name.contains("VDD") || name.contains("VDP") {
            Self::Power
        } else if name.to_uppercase().contains('Q') {
            Self::Signal
        } else {
            Self::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> LabelRegistry {
        LabelRegistry::from_boxes([
            LabelBox::new("A", Side::Left, Rect::new(0.0, 0.0, 60.0, 20.0)),
            LabelBox::new("79", Side::Right, Rect::new(500.0, 0.0, 560.0, 20.0)),
            LabelBox::new("K", Side::Top, Rect::new(100.0, 0.0, 120.0, 60.0)),
            LabelBox::new("E", Side::Bottom, Rect::new(100.0, 500.0, 120.0, 560.0)),
        ])
    }

    #[test]
    fn normalise_strips_whitespace_and_uppercases() {
        assert_eq!(normalise_label(" a b "), "AB");
        assert_eq!(normalise_label("d\u{00A0}"), "D");
        assert_eq!(normalise_label("79"), "79");
    }

    #[test]
    fn lookup_exact_then_normalised() {
        let registry = sample_registry();
        assert_eq!(registry.lookup("A").unwrap().label, "A");
        assert_eq!(registry.lookup(" a").unwrap().label, "A");
        assert_eq!(registry.lookup("7 9").unwrap().label, "79");
        assert!(registry.lookup("Z").is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn inner_anchor_faces_the_die() {
        let registry = sample_registry();
        let left = registry.lookup("A").unwrap().inner_anchor();
        assert!(left.approx_eq(&Point::new(60.0, 10.0), 1e-9));
        let right = registry.lookup("79").unwrap().inner_anchor();
        assert!(right.approx_eq(&Point::new(500.0, 10.0), 1e-9));
        let top = registry.lookup("K").unwrap().inner_anchor();
        assert!(top.approx_eq(&Point::new(110.0, 60.0), 1e-9));
        let bottom = registry.lookup("E").unwrap().inner_anchor();
        assert!(bottom.approx_eq(&Point::new(110.0, 500.0), 1e-9));
    }

    #[test]
    fn lead_fill_categories() {
        assert_eq!(LeadFill::for_pin_name(None), LeadFill::Empty);
        assert_eq!(LeadFill::for_pin_name(Some("  ")), LeadFill::Empty);
        assert_eq!(LeadFill::for_pin_name(Some("VSS1")), LeadFill::Ground);
        assert_eq!(LeadFill::for_pin_name(Some("VDDIO")), LeadFill::Power);
        assert_eq!(LeadFill::for_pin_name(Some("VDP")), LeadFill::Power);
        assert_eq!(LeadFill::for_pin_name(Some("dq3")), LeadFill::Signal);
        assert_eq!(LeadFill::for_pin_name(Some("CLK")), LeadFill::Plain);
    }

    #[test]
    fn corner_pairs_cover_all_corners() {
        assert_eq!(CORNER_PAIRS.len(), 4);
        assert!(CORNER_PAIRS
            .iter()
            .any(|c| c.corner == Corner::LowerLeft && c.labels == ["D", "E"]));
    }
}
