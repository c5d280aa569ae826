//! Sweep events and the order in which they fire.

use std::cmp::Ordering;

use crate::beachline::ArcIdx;
use crate::diagram::SiteIdx;
use crate::geom::Point;

/// What happens when an event fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum EventKind {
    /// The sweep reached a site, which starts a new arc.
    Site(SiteIdx),
    /// An arc shrinks to a point. The point becomes a vertex of the diagram.
    Circle {
        /// The center of the circle through the three sites involved.
        point: Point,
        /// The arc that disappears.
        arc: ArcIdx,
    },
}

/// An event, keyed by the sweep coordinate at which it fires.
///
/// Events are ordered so that a max-heap pops them in sweep order: a larger
/// `y` comes first. Among events with the same `y`, circle events come before
/// site events, then events with smaller `x`, and then events with smaller
/// site or arc index.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Event {
    pub y: f64,
    pub x: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn site(idx: SiteIdx, point: Point) -> Self {
        Event {
            y: point.y,
            x: point.x,
            kind: EventKind::Site(idx),
        }
    }

    /// A circle event firing at sweep coordinate `y`, removing `arc` and
    /// creating a vertex at `point`.
    pub fn circle(y: f64, point: Point, arc: ArcIdx) -> Self {
        Event {
            y,
            x: point.x,
            kind: EventKind::Circle { point, arc },
        }
    }

    fn rank(&self) -> (u8, usize) {
        match self.kind {
            EventKind::Site(idx) => (0, idx.index()),
            EventKind::Circle { arc, .. } => (1, arc.index()),
        }
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        let (kind, idx) = self.rank();
        let (other_kind, other_idx) = other.rank();
        self.y
            .total_cmp(&other.y)
            .then(kind.cmp(&other_kind))
            .then(other.x.total_cmp(&self.x))
            .then(other_idx.cmp(&idx))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}
