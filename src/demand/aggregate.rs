use itertools::Itertools;

use super::{DemandBound, RequestBound};
use crate::time::{self, Duration, Service};

/// A wrapper type for representing the total demand of a vector of
/// individual demand sources (e.g., all tasks of a component).
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate<T> {
    individual: Vec<T>,
}

impl<T> Aggregate<T> {
    pub fn new(components: Vec<T>) -> Self {
        Aggregate {
            individual: components,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.individual.iter()
    }

    pub fn len(&self) -> usize {
        self.individual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individual.is_empty()
    }
}

impl<T: RequestBound> RequestBound for Aggregate<T> {
    fn service_needed(&self, delta: Duration) -> Service {
        self.individual
            .iter()
            .map(|rbf| rbf.service_needed(delta))
            .sum()
    }
}

impl<T: DemandBound> DemandBound for Aggregate<T> {
    fn demand(&self, delta: Duration) -> Service {
        self.individual.iter().map(|dbf| dbf.demand(delta)).sum()
    }

    fn steps_until<'a>(&'a self, horizon: Duration) -> Box<dyn Iterator<Item = Duration> + 'a> {
        Box::new(
            self.individual
                .iter()
                .map(|dbf| dbf.steps_until(horizon))
                .kmerge()
                .dedup_by(|a, b| time::approx_eq(*a, *b)),
        )
    }
}
