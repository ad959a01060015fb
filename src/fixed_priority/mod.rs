/*! Response-time analysis for *fixed-priority* (**FP**) scheduling

This module provides the classic iterative response-time analysis of
Joseph & Pandya and Audsley et al. for independent, fully preemptive
periodic tasks, both on a dedicated processor and on a processor that
is available only according to a supply-bound function (e.g., the
budget of a component).

A task set is analyzed from the highest to the lowest priority; each
task's response time is the least fixed point of

`R = WCET + Σ_{j ∈ hp} ⌈R / T_j⌉ · WCET_j`

on the given supply. If the iteration exceeds the task's deadline, the
task is deemed unschedulable and no response time is reported.
*/

use tracing::debug;

use crate::demand;
use crate::supply::{Dedicated, SupplyBound};
use crate::time::{Duration, Service};

pub mod fully_preemptive;

/// The parameters of a task relevant to fixed-priority RTA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub wcet: Service,
    pub period: Duration,
    pub deadline: Duration,
    /// Lower number = higher priority.
    pub priority: u32,
}

impl Task {
    pub fn new(wcet: Service, period: Duration, priority: u32) -> Self {
        Task {
            wcet,
            period,
            deadline: period,
            priority,
        }
    }

    fn rbf(&self) -> demand::Periodic {
        demand::Periodic::with_deadline(self.wcet, self.period, self.deadline)
    }
}

/// Bound the response time of every task of a flat task set on a
/// dedicated uniprocessor.
///
/// The result is in the order of `tasks`; `None` marks a task whose
/// response time exceeds its deadline.
pub fn response_times(tasks: &[Task]) -> Vec<Option<Duration>> {
    response_times_under(&Dedicated::new(), tasks)
}

/// Bound the response time of every task of a flat task set that is
/// served by `supply`.
///
/// Tasks are processed in order of decreasing priority; only tasks of
/// strictly higher priority interfere. The result is in the order of
/// `tasks`.
pub fn response_times_under<SBF>(supply: &SBF, tasks: &[Task]) -> Vec<Option<Duration>>
where
    SBF: SupplyBound + ?Sized,
{
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|i| (tasks[*i].priority, *i));

    let mut bounds = vec![None; tasks.len()];
    for i in order {
        let tua = &tasks[i];
        let interference = demand::Aggregate::new(
            tasks
                .iter()
                .filter(|other| other.priority < tua.priority)
                .map(Task::rbf)
                .collect(),
        );
        let result =
            fully_preemptive::rta(supply, &interference, &tua.rbf(), tua.deadline);
        debug!(task = i, ?result, "fixed-priority RTA");
        bounds[i] = result.ok();
    }
    bounds
}

#[cfg(test)]
mod tests;
