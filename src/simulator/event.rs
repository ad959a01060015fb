use std::cmp::Ordering;

use crate::model::{ComponentId, TaskId};
use crate::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EventKind {
    /// A component's budget is reset to its full value.
    Replenish(ComponentId),
    /// A task releases its next job.
    Release(TaskId),
}

impl EventKind {
    // Replenishments are applied before releases at the same instant.
    fn rank(&self) -> (u8, usize) {
        match self {
            EventKind::Replenish(c) => (0, c.index()),
            EventKind::Release(t) => (1, t.index()),
        }
    }
}

/// A simulation event, ordered by timestamp and then by kind and index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Event {
    pub at: Instant,
    pub kind: EventKind,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at
            .total_cmp(&other.at)
            .then_with(|| self.kind.rank().cmp(&other.kind.rank()))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Order events of one instant in the sequence they are applied.
pub(super) fn apply_order(a: &Event, b: &Event) -> Ordering {
    a.kind.rank().cmp(&b.kind.rank())
}
