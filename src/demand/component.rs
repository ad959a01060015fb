use itertools::Itertools;

use super::{Aggregate, DemandBound, FixedPriority, Periodic};
use crate::model::{ComponentId, Policy, System};
use crate::time::{self, Duration, Service};

/// The demand of all tasks of a component under the component's own
/// scheduling policy, with job costs scaled to the hosting core.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentDemand {
    /// EDF: the sum of all tasks' demand-bound functions.
    Edf(Aggregate<Periodic>),
    /// Fixed priority: the maximum over all tasks of the demand seen by
    /// that task.
    FixedPriority(Vec<FixedPriority>),
}

impl ComponentDemand {
    pub fn of(system: &System, component: ComponentId) -> Self {
        let speed = system.speed_of(component);
        let comp = system.component(component);
        let tasks: Vec<(u32, Periodic)> = comp
            .tasks
            .iter()
            .map(|t| {
                let task = system.task(*t);
                (task.priority, Periodic::of_task(task, speed))
            })
            .collect();
        match comp.policy {
            Policy::EarliestDeadlineFirst => {
                ComponentDemand::Edf(Aggregate::new(tasks.into_iter().map(|(_, d)| d).collect()))
            }
            Policy::RateMonotonic => ComponentDemand::FixedPriority(
                tasks
                    .iter()
                    .enumerate()
                    .map(|(i, (prio, target))| {
                        let hep = tasks
                            .iter()
                            .enumerate()
                            .filter(|(j, (other, _))| *j != i && other <= prio)
                            .map(|(_, (_, d))| *d)
                            .collect();
                        FixedPriority::new(*target, hep)
                    })
                    .collect(),
            ),
        }
    }

    /// Iterate the demand of the individual tasks.
    pub fn tasks(&self) -> Box<dyn Iterator<Item = &Periodic> + '_> {
        match self {
            ComponentDemand::Edf(all) => Box::new(all.iter()),
            ComponentDemand::FixedPriority(per_task) => Box::new(per_task.iter().map(|fp| &fp.target)),
        }
    }

    /// Total utilization of the (scaled) tasks.
    pub fn utilization(&self) -> f64 {
        self.tasks().map(Periodic::utilization).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().next().is_none()
    }
}

impl DemandBound for ComponentDemand {
    fn demand(&self, delta: Duration) -> Service {
        match self {
            ComponentDemand::Edf(all) => all.demand(delta),
            ComponentDemand::FixedPriority(per_task) => per_task
                .iter()
                .map(|fp| fp.demand(delta))
                .fold(0.0, f64::max),
        }
    }

    fn steps_until<'a>(&'a self, horizon: Duration) -> Box<dyn Iterator<Item = Duration> + 'a> {
        Box::new(
            self.tasks()
                .map(move |task| task.steps_until(horizon))
                .kmerge()
                .dedup_by(|a, b| time::approx_eq(*a, *b)),
        )
    }
}
