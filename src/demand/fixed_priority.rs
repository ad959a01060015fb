use itertools::Itertools;

use super::{Aggregate, DemandBound, Periodic};
use crate::time::{self, Duration, Service};

/// The demand seen by one task under fixed-priority scheduling.
///
/// The target task and every other task of higher or equal priority
/// contribute the cost of each of their jobs whose deadline falls into
/// the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPriority {
    pub target: Periodic,
    pub interfering: Aggregate<Periodic>,
}

impl FixedPriority {
    pub fn new(target: Periodic, interfering: Vec<Periodic>) -> Self {
        FixedPriority {
            target,
            interfering: Aggregate::new(interfering),
        }
    }
}

impl DemandBound for FixedPriority {
    fn demand(&self, delta: Duration) -> Service {
        self.target.demand(delta) + self.interfering.demand(delta)
    }

    fn steps_until<'a>(&'a self, horizon: Duration) -> Box<dyn Iterator<Item = Duration> + 'a> {
        Box::new(
            self.target
                .steps_until(horizon)
                .merge(self.interfering.steps_until(horizon))
                .dedup_by(|a, b| time::approx_eq(*a, *b)),
        )
    }
}
