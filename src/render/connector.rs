//! Bond wire connector construction.

use serde::Serialize;

use crate::geometry::{Point, Segment};
use crate::layout::Ring;
use crate::render::style::LineScope;

/// A bond wire from a pin to its lead's inner anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorSegment {
    /// Pin number of the wired pin.
    pub pin_id: String,
    /// Label of the lead the wire ends at.
    pub label: String,
    /// Pin position.
    pub from: Point,
    /// Lead inner anchor.
    pub to: Point,
    /// Ring of the wired pin.
    pub ring: Ring,
}

impl ConnectorSegment {
    /// The wire as a bare segment.
    #[must_use]
    pub const fn segment(&self) -> Segment {
        Segment::new(self.from, self.to)
    }
}

/// Builds the connector for a pin, or `None` if the scope hides it.
///
/// Under `inner`/`outer` scope, pins of unknown ring are hidden. The pin's
/// dot is drawn either way; this only decides the wire.
#[must_use]
pub fn build_connector(
    pin_id: &str,
    label: &str,
    pin_point: Point,
    anchor: Point,
    ring: Ring,
    scope: LineScope,
) -> Option<ConnectorSegment> {
    scope.admits(ring).then(|| ConnectorSegment {
        pin_id: pin_id.to_string(),
        label: label.to_string(),
        from: pin_point,
        to: anchor,
        ring,
    })
}
