//! Scene assembly: from pin records to drawable dots, wires and conflicts.
//!
//! # Pipeline
//!
//! ```text
//! PinTable ──▶ dedupe by pin_no ──▶ match lead labels ──▶ CoordinateMapper
//!                                          │                      │
//!                                  unmatched → invalid            ▼
//!                                                         classify_sides
//!                                                                 │
//!                                                                 ▼
//!                                                    RingLayout::detect/classify
//!                                                                 │
//!                                          ┌──────────────────────┤
//!                                          ▼                      ▼
//!                                    style colours        build_connector
//!                                                                 │
//!                                                                 ▼
//!                                                         detect_conflicts
//! ```
//!
//! [`render`] is a pure function of its inputs. Every call recomputes the
//! whole scene; nothing is cached between calls.

pub mod conflict;
pub mod connector;
pub mod style;

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::geometry::{CalibrationAnchors, ChipSize, CoordinateMapper, Point};
use crate::layout::{
    classify_sides, Ring, RingLayout, RingRects, RingThreshold, Side, SideBuckets,
    DEFAULT_SIDE_EPSILON,
};
use crate::package::{LabelBox, LabelRegistry, LeadFill};
use crate::pins::{PinRecord, PinTable};

pub use conflict::{detect_conflicts, ConflictReport, CornerConflict, Crossing};
pub use connector::{build_connector, ConnectorSegment};
pub use style::{ColorScheme, LineScope, PaletteId, PinStyle, Rgb};

/// Tunables of one render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Dot and wire styling, including the requested line scope.
    pub style: PinStyle,
    /// Minimum rail separation for a side to count as double-row.
    pub ring_threshold: RingThreshold,
    /// Tolerance for side tie-breaks.
    pub side_epsilon: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            style: PinStyle::default(),
            ring_threshold: RingThreshold::default(),
            side_epsilon: DEFAULT_SIDE_EPSILON,
        }
    }
}

/// A pin with its lead box and display position.
#[derive(Debug, Clone, Copy)]
pub struct MappedPin<'a> {
    /// Source record.
    pub record: &'a PinRecord,
    /// Lead box the pin is wired to.
    pub lead: &'a LabelBox,
    /// Display position.
    pub point: Point,
}

/// A drawn pin dot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinDot {
    /// Package pin number.
    pub pin_no: String,
    /// Net name.
    pub pin_name: String,
    /// Label of the matched lead.
    pub label: String,
    /// Display position.
    pub point: Point,
    /// Side of the pin cloud the pin sits on.
    pub side: Side,
    /// Ring membership.
    pub ring: Ring,
    /// Fill colour.
    pub color: Rgb,
}

/// A drawn bond wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    /// Package pin number.
    pub pin_no: String,
    /// Label of the lead the wire ends at.
    pub label: String,
    /// Pin end.
    pub from: Point,
    /// Lead end.
    pub to: Point,
    /// Stroke colour.
    pub color: Rgb,
    /// Stroke width.
    pub width: f64,
    /// Ring of the wired pin.
    pub ring: Ring,
    /// Whether the wire takes part in a crossing or corner conflict.
    pub conflict: bool,
}

/// State of one package lead box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadState {
    /// Lead label.
    pub label: String,
    /// Package side.
    pub side: Side,
    /// Name of the pin assigned to the lead, if any.
    pub pin_name: Option<String>,
    /// Box fill category.
    pub fill: LeadFill,
    /// Whether a wire ends at this lead.
    pub connected: bool,
}

/// Everything needed to draw one pin diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Calibration anchors in effect, if any.
    pub anchors: Option<CalibrationAnchors>,
    /// Pin dots, one per mapped pin.
    pub dots: Vec<PinDot>,
    /// Drawn wires.
    pub connectors: Vec<Connector>,
    /// Whether a double-row layout was detected.
    pub two_rings: bool,
    /// Line scope actually applied.
    pub line_scope: LineScope,
    /// Whether the scope was forced to `all` by a single-ring layout.
    pub scope_locked: bool,
    /// Rows that could not be wired, as `"{pin_no}, {pin_name}"`.
    pub invalid_pins: Vec<String>,
    /// Package lead boxes in layout order.
    pub leads: Vec<LeadState>,
    /// Outer and inner reference rectangles, when rails exist.
    pub ring_rects: Option<RingRects>,
    /// Over-subscribed corners.
    pub corner_conflicts: Vec<CornerConflict>,
    /// Crossing wire pairs.
    pub crossings: Vec<Crossing>,
    /// Dot radius.
    pub dot_radius: f64,
    /// Wire width.
    pub line_width: f64,
}

impl Scene {
    /// Returns `true` if any conflict was found.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.corner_conflicts.is_empty() || !self.crossings.is_empty()
    }

    /// Number of wires flagged as conflicting.
    #[must_use]
    pub fn conflicting_connectors(&self) -> usize {
        self.connectors.iter().filter(|c| c.conflict).count()
    }

    /// Labels of leads that received a wire.
    pub fn connected_labels(&self) -> impl Iterator<Item = &str> {
        self.leads
            .iter()
            .filter(|l| l.connected)
            .map(|l| l.label.as_str())
    }
}

/// Drops earlier duplicates of a pin number, keeping first-seen order.
fn dedupe(pins: &[PinRecord]) -> Vec<&PinRecord> {
    let mut by_no: IndexMap<&str, &PinRecord> = IndexMap::with_capacity(pins.len());
    for pin in pins {
        by_no.insert(pin.pin_no.as_str(), pin);
    }
    by_no.into_values().collect()
}

/// Matches pins to lead boxes. Unmatched pins are appended to `invalid`.
fn match_leads<'a>(
    pins: &[&'a PinRecord],
    labels: &'a LabelRegistry,
    invalid: &mut Vec<String>,
) -> Vec<(&'a PinRecord, &'a LabelBox)> {
    let mut matched = Vec::with_capacity(pins.len());
    for pin in pins {
        if let Some(lead) = labels.lookup(&pin.pin_no) {
            matched.push((*pin, lead));
        } else {
            let entry = pin.invalid_entry();
            warn!(pin_no = %pin.pin_no, "No lead label for pin");
            if !invalid.contains(&entry) {
                invalid.push(entry);
            }
        }
    }
    matched
}

fn lead_states(
    labels: &LabelRegistry,
    names: &HashMap<&str, &str>,
    connected: &HashSet<&str>,
) -> Vec<LeadState> {
    labels
        .iter()
        .map(|lead| {
            let pin_name = names.get(lead.label.as_str()).map(|n| (*n).to_string());
            LeadState {
                label: lead.label.clone(),
                side: lead.side,
                fill: LeadFill::for_pin_name(pin_name.as_deref()),
                pin_name,
                connected: connected.contains(lead.label.as_str()),
            }
        })
        .collect()
}

/// Renders a pin table onto a package outline.
///
/// Without both calibration anchors and a positive chip size nothing is
/// drawn, but the invalid-pin list and lead assignments are still reported.
#[must_use]
pub fn render(
    table: &PinTable,
    chip: Option<&ChipSize>,
    anchors: Option<&CalibrationAnchors>,
    labels: &LabelRegistry,
    settings: &RenderSettings,
) -> Scene {
    let style = &settings.style;
    let mut invalid_pins = table.invalid.clone();

    let unique = dedupe(&table.valid);
    let matched = match_leads(&unique, labels, &mut invalid_pins);
    let names: HashMap<&str, &str> = matched
        .iter()
        .map(|(pin, lead)| (lead.label.as_str(), pin.pin_name.as_str()))
        .collect();

    let mut scene = Scene {
        anchors: anchors.copied(),
        dots: Vec::new(),
        connectors: Vec::new(),
        two_rings: false,
        line_scope: LineScope::All,
        scope_locked: true,
        invalid_pins,
        leads: Vec::new(),
        ring_rects: None,
        corner_conflicts: Vec::new(),
        crossings: Vec::new(),
        dot_radius: style.dot_radius(),
        line_width: style.line_width(),
    };

    let Some(mapper) = CoordinateMapper::new(anchors, chip) else {
        debug!(
            anchors = anchors.is_some(),
            chip = chip.is_some(),
            "Calibration incomplete, nothing drawn"
        );
        scene.leads = lead_states(labels, &names, &HashSet::new());
        return scene;
    };

    let mapped: Vec<MappedPin<'_>> = matched
        .iter()
        .map(|&(record, lead)| MappedPin {
            record,
            lead,
            point: mapper.map(record.x, record.y),
        })
        .collect();
    let points: Vec<Point> = mapped.iter().map(|m| m.point).collect();

    let sides = classify_sides(&points, settings.side_epsilon);
    let buckets = SideBuckets::from_points(&points, &sides);
    let threshold = settings.ring_threshold.resolve(style.line_width());
    let layout = RingLayout::detect(&buckets, threshold);

    scene.two_rings = layout.has_two_rings();
    scene.scope_locked = !scene.two_rings;
    scene.line_scope = if scene.scope_locked {
        LineScope::All
    } else {
        style.line_scope
    };
    scene.ring_rects = layout.rails().map(|r| r.rects());

    let mut segments = Vec::with_capacity(mapped.len());
    let mut colors = Vec::with_capacity(mapped.len());
    for (pin, side) in mapped.iter().zip(&sides) {
        let ring = layout.classify(*side, side.axis_value(pin.point));
        let color = style.color_scheme.resolve(ring);

        scene.dots.push(PinDot {
            pin_no: pin.record.pin_no.clone(),
            pin_name: pin.record.pin_name.clone(),
            label: pin.lead.label.clone(),
            point: pin.point,
            side: *side,
            ring,
            color,
        });

        if let Some(segment) = build_connector(
            &pin.record.pin_no,
            &pin.lead.label,
            pin.point,
            pin.lead.inner_anchor(),
            ring,
            scene.line_scope,
        ) {
            segments.push(segment);
            colors.push(color);
        }
    }

    let report = detect_conflicts(&segments, mapped.iter().map(|m| m.lead.label.as_str()));
    let connected: HashSet<&str> = segments.iter().map(|s| s.label.as_str()).collect();
    scene.leads = lead_states(labels, &names, &connected);

    scene.connectors = segments
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (segment, color))| Connector {
            pin_no: segment.pin_id.clone(),
            label: segment.label.clone(),
            from: segment.from,
            to: segment.to,
            color,
            width: style.line_width(),
            ring: segment.ring,
            conflict: report.is_flagged(i),
        })
        .collect();
    scene.corner_conflicts = report.corners;
    scene.crossings = report.crossings;

    debug!(
        pins = scene.dots.len(),
        connectors = scene.connectors.len(),
        invalid = scene.invalid_pins.len(),
        two_rings = scene.two_rings,
        scope = %scene.line_scope,
        conflicts = scene.conflicting_connectors(),
        "Scene rendered"
    );

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    const EPS: f64 = 1e-9;

    /// Die micrometres equal display units with Y flipped.
    fn unit_calibration() -> (ChipSize, CalibrationAnchors) {
        (
            ChipSize::new(100.0, 100.0),
            CalibrationAnchors::new(Point::new(0.0, 100.0), Point::new(100.0, 0.0)),
        )
    }

    /// One lead box per pin, placed outside the die on `side`.
    fn registry(ids: &[(&str, Side)]) -> LabelRegistry {
        LabelRegistry::from_boxes((0u32..).zip(ids).map(|(i, (id, side))| {
            let offset = 10.0 * f64::from(i);
            let rect = match side {
                Side::Left => Rect::new(-80.0, offset, -20.0, offset + 8.0),
                Side::Right => Rect::new(120.0, offset, 180.0, offset + 8.0),
                Side::Top => Rect::new(offset, -80.0, offset + 8.0, -20.0),
                Side::Bottom => Rect::new(offset, 120.0, offset + 8.0, 180.0),
            };
            LabelBox::new(*id, *side, rect)
        }))
    }

    /// Double-row layout in die micrometres.
    fn double_row_pins() -> Vec<(&'static str, Side, f64, f64)> {
        vec![
            ("L1", Side::Left, 5.0, 35.0),
            ("L2", Side::Left, 6.0, 40.0),
            ("L3", Side::Left, 7.0, 45.0),
            ("L4", Side::Left, 20.0, 55.0),
            ("L5", Side::Left, 21.0, 60.0),
            ("L6", Side::Left, 22.0, 65.0),
            ("L7", Side::Left, 15.0, 50.0),
            ("R1", Side::Right, 95.0, 40.0),
            ("R2", Side::Right, 80.0, 60.0),
            ("T1", Side::Top, 40.0, 95.0),
            ("T2", Side::Top, 60.0, 80.0),
            ("B1", Side::Bottom, 40.0, 5.0),
            ("B2", Side::Bottom, 60.0, 20.0),
        ]
    }

    fn table_and_labels(pins: &[(&'static str, Side, f64, f64)]) -> (PinTable, LabelRegistry) {
        let table = PinTable {
            valid: pins
                .iter()
                .map(|(id, _, x, y)| PinRecord::new(*id, format!("N{id}"), *x, *y))
                .collect(),
            invalid: Vec::new(),
        };
        let ids: Vec<(&str, Side)> = pins.iter().map(|(id, side, _, _)| (*id, *side)).collect();
        (table, registry(&ids))
    }

    fn dot<'a>(scene: &'a Scene, pin_no: &str) -> &'a PinDot {
        scene.dots.iter().find(|d| d.pin_no == pin_no).unwrap()
    }

    #[test]
    fn end_to_end_double_row() {
        let (chip, anchors) = unit_calibration();
        let (table, labels) = table_and_labels(&double_row_pins());
        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &RenderSettings::default());

        assert!(scene.two_rings);
        assert!(!scene.scope_locked);
        assert_eq!(scene.dots.len(), 13);
        assert_eq!(scene.connectors.len(), 13);

        let l7 = dot(&scene, "L7");
        assert_eq!(l7.side, Side::Left);
        assert_eq!(l7.ring, Ring::Inner);
        assert!(l7.point.approx_eq(&Point::new(15.0, 50.0), EPS));

        assert_eq!(dot(&scene, "L1").ring, Ring::Outer);
        assert_eq!(dot(&scene, "L5").ring, Ring::Inner);
        assert_eq!(dot(&scene, "R1").ring, Ring::Outer);
        assert_eq!(dot(&scene, "R2").ring, Ring::Inner);
        assert_eq!(dot(&scene, "T1").ring, Ring::Outer);
        assert_eq!(dot(&scene, "B2").ring, Ring::Inner);

        let scheme = ColorScheme::default();
        assert_eq!(l7.color, scheme.inner());
        assert_eq!(dot(&scene, "L1").color, scheme.outer());

        let rects = scene.ring_rects.unwrap();
        assert!((rects.outer.left - 5.0).abs() < EPS);
        assert!((rects.inner.left - 22.0).abs() < EPS);
    }

    #[test]
    fn restrictive_scope_keeps_dots_drops_wires() {
        let (chip, anchors) = unit_calibration();
        let (table, labels) = table_and_labels(&double_row_pins());
        let mut settings = RenderSettings::default();
        settings.style.line_scope = LineScope::Inner;

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &settings);
        assert_eq!(scene.line_scope, LineScope::Inner);
        assert_eq!(scene.dots.len(), 13);
        assert!(scene.connectors.iter().all(|c| c.ring == Ring::Inner));
        assert_eq!(
            scene.connectors.len(),
            scene.dots.iter().filter(|d| d.ring == Ring::Inner).count()
        );

        let connected: Vec<&str> = scene.connected_labels().collect();
        assert!(connected.contains(&"L7"));
        assert!(!connected.contains(&"L1"));
    }

    #[test]
    fn single_row_locks_scope() {
        let (chip, anchors) = unit_calibration();
        let pins = vec![
            ("L1", Side::Left, 5.0, 40.0),
            ("L2", Side::Left, 5.0, 60.0),
            ("R1", Side::Right, 95.0, 40.0),
            ("R2", Side::Right, 95.0, 60.0),
            ("T1", Side::Top, 40.0, 95.0),
            ("T2", Side::Top, 60.0, 95.0),
            ("B1", Side::Bottom, 40.0, 5.0),
            ("B2", Side::Bottom, 60.0, 5.0),
        ];
        let (table, labels) = table_and_labels(&pins);
        let mut settings = RenderSettings::default();
        settings.style.line_scope = LineScope::Outer;

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &settings);
        assert!(!scene.two_rings);
        assert!(scene.scope_locked);
        assert_eq!(scene.line_scope, LineScope::All);
        assert_eq!(scene.connectors.len(), 8);
        assert!(scene.dots.iter().all(|d| d.ring == Ring::Unknown));
        assert!(scene
            .dots
            .iter()
            .all(|d| d.color == settings.style.color_scheme.outer()));
    }

    #[test]
    fn missing_calibration_draws_nothing() {
        let (chip, _) = unit_calibration();
        let (mut table, labels) = table_and_labels(&double_row_pins());
        table.invalid.push("9, NC".to_string());

        let scene = render(&table, Some(&chip), None, &labels, &RenderSettings::default());
        assert!(scene.dots.is_empty());
        assert!(scene.connectors.is_empty());
        assert_eq!(scene.invalid_pins, vec!["9, NC"]);
        assert_eq!(scene.leads.len(), 13);
        assert!(scene.leads.iter().all(|l| l.pin_name.is_some() && !l.connected));
    }

    #[test]
    fn unmatched_pins_become_invalid() {
        let (chip, anchors) = unit_calibration();
        let (mut table, labels) = table_and_labels(&double_row_pins());
        table.valid.push(PinRecord::new("ZZ", "CLK", 50.0, 50.0));

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &RenderSettings::default());
        assert_eq!(scene.invalid_pins, vec!["ZZ, CLK"]);
        assert!(scene.dots.iter().all(|d| d.pin_no != "ZZ"));
    }

    #[test]
    fn duplicate_pin_numbers_keep_last() {
        let (chip, anchors) = unit_calibration();
        let (mut table, labels) = table_and_labels(&double_row_pins());
        table.valid.push(PinRecord::new("L7", "LATE", 16.0, 52.0));

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &RenderSettings::default());
        assert_eq!(scene.dots.len(), 13);
        let l7 = dot(&scene, "L7");
        assert_eq!(l7.pin_name, "LATE");
        assert!(l7.point.approx_eq(&Point::new(16.0, 48.0), EPS));
    }

    #[test]
    fn corner_conflict_is_flagged_in_scene() {
        let (chip, anchors) = unit_calibration();
        let mut pins = double_row_pins();
        pins.push(("D", Side::Left, 5.0, 30.0));
        pins.push(("E", Side::Bottom, 30.0, 5.0));
        let (table, labels) = table_and_labels(&pins);

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &RenderSettings::default());
        assert!(scene.has_conflicts());
        assert_eq!(scene.corner_conflicts.len(), 1);
        let flagged: Vec<&str> = scene
            .connectors
            .iter()
            .filter(|c| c.conflict)
            .map(|c| c.pin_no.as_str())
            .collect();
        assert!(flagged.contains(&"D"));
        assert!(flagged.contains(&"E"));
    }

    #[test]
    fn corner_conflict_ignores_line_scope() {
        let (chip, anchors) = unit_calibration();
        let mut pins = double_row_pins();
        pins.push(("D", Side::Left, 15.0, 30.0));
        pins.push(("E", Side::Bottom, 30.0, 5.0));
        let (table, labels) = table_and_labels(&pins);
        let mut settings = RenderSettings::default();
        settings.style.line_scope = LineScope::Inner;

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &settings);
        assert_eq!(dot(&scene, "D").ring, Ring::Inner);
        assert_eq!(dot(&scene, "E").ring, Ring::Outer);
        assert_eq!(scene.corner_conflicts.len(), 1);
        assert!(scene.has_conflicts());

        let d = scene.connectors.iter().find(|c| c.pin_no == "D").unwrap();
        assert!(d.conflict);
        assert!(scene.connectors.iter().all(|c| c.pin_no != "E"));
    }

    #[test]
    fn sizes_follow_style() {
        let (chip, anchors) = unit_calibration();
        let (table, labels) = table_and_labels(&double_row_pins());
        let mut settings = RenderSettings::default();
        settings.style.scale = 2.0;

        let scene = render(&table, Some(&chip), Some(&anchors), &labels, &settings);
        assert!((scene.dot_radius - 2.0).abs() < EPS);
        assert!(scene.connectors.iter().all(|c| (c.width - 2.0).abs() < EPS));
    }
}
