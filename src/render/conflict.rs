//! Wiring conflict detection.
//!
//! Two independent, advisory checks:
//!
//! - **Corner exclusivity**: each package corner is flanked by two leads (see
//!   [`CORNER_PAIRS`]) and can carry only one wire. If both leads have a
//!   matched pin, the corner is over-subscribed and every drawn wire to either
//!   lead is flagged. The line scope decides which wires are drawn, not
//!   whether the corner conflicts.
//! - **Crossings**: wires in the same ring must not cross. Inner and outer
//!   rings are checked separately; wires of unknown ring are only checked
//!   (against each other) when no wire has an established ring.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::geometry::segments_intersect;
use crate::layout::Ring;
use crate::package::{normalise_label, Corner, CORNER_PAIRS};
use crate::render::connector::ConnectorSegment;

/// Both leads of a corner have a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CornerConflict {
    /// The over-subscribed corner.
    pub corner: Corner,
    /// Its two lead labels.
    pub labels: [&'static str; 2],
}

/// Two wires cross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crossing {
    /// Pin number of the first wire.
    pub first: String,
    /// Pin number of the second wire.
    pub second: String,
}

/// Result of conflict detection, indexed like the input connectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    /// `flagged[i]` is `true` when connector `i` takes part in any conflict.
    pub flagged: Vec<bool>,
    /// Corner exclusivity violations.
    pub corners: Vec<CornerConflict>,
    /// Crossing wire pairs.
    pub crossings: Vec<Crossing>,
}

impl ConflictReport {
    /// Returns `true` if nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.corners.is_empty() && self.crossings.is_empty()
    }

    /// Number of flagged connectors.
    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.flagged.iter().filter(|f| **f).count()
    }

    /// Returns `true` if connector `index` is flagged.
    #[must_use]
    pub fn is_flagged(&self, index: usize) -> bool {
        self.flagged.get(index).copied().unwrap_or(false)
    }
}

/// Finds corners whose two leads are both among `present`.
///
/// `present` holds the lead labels of every matched, displayed pin, drawn or
/// not. Labels are normalised before comparison.
#[must_use]
pub fn corner_conflicts<'a, I>(present: I) -> Vec<CornerConflict>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: HashSet<String> = present.into_iter().map(normalise_label).collect();
    CORNER_PAIRS
        .iter()
        .filter(|pair| pair.labels.iter().all(|l| present.contains(*l)))
        .map(|pair| CornerConflict {
            corner: pair.corner,
            labels: pair.labels,
        })
        .collect()
}

/// Index groups that are checked for crossings.
fn crossing_groups(connectors: &[ConnectorSegment]) -> Vec<Vec<usize>> {
    let by_ring = |ring: Ring| -> Vec<usize> {
        connectors
            .iter()
            .enumerate()
            .filter(|(_, c)| c.ring == ring)
            .map(|(i, _)| i)
            .collect()
    };
    let inner = by_ring(Ring::Inner);
    let outer = by_ring(Ring::Outer);

    if inner.is_empty() && outer.is_empty() {
        vec![(0..connectors.len()).collect()]
    } else {
        vec![inner, outer]
    }
}

/// Finds all crossing connector pairs `(i, j)` with `i < j`.
#[must_use]
pub fn crossing_pairs(connectors: &[ConnectorSegment]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for group in crossing_groups(connectors) {
        for (n, &i) in group.iter().enumerate() {
            let a = connectors[i].segment();
            for &j in &group[n + 1..] {
                if segments_intersect(&a, &connectors[j].segment()) {
                    pairs.push((i.min(j), i.max(j)));
                }
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Runs both conflict checks.
///
/// Corners are judged from `present` (see [`corner_conflicts`]); crossings and
/// the `flagged` vector only concern the drawn `connectors`.
#[must_use]
pub fn detect_conflicts<'a, I>(connectors: &[ConnectorSegment], present: I) -> ConflictReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut flagged = vec![false; connectors.len()];

    let corners = corner_conflicts(present);
    for conflict in &corners {
        for (i, c) in connectors.iter().enumerate() {
            if conflict.labels.contains(&normalise_label(&c.label).as_str()) {
                flagged[i] = true;
            }
        }
    }

    let crossings = crossing_pairs(connectors)
        .into_iter()
        .map(|(i, j)| {
            flagged[i] = true;
            flagged[j] = true;
            Crossing {
                first: connectors[i].pin_id.clone(),
                second: connectors[j].pin_id.clone(),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        connectors = connectors.len(),
        corners = corners.len(),
        crossings = crossings.len(),
        "Conflict detection complete"
    );

    ConflictReport {
        flagged,
        corners,
        crossings,
    }
}
