use crate::model::{Component, Policy, System, Task};
use crate::time::{Duration, Instant, Service, EPSILON};

/// Mutable per-run state of a task.
#[derive(Debug, Clone, Default)]
pub(super) struct TaskState {
    /// Remaining execution of the current job, scaled to the core.
    pub remaining: Service,
    pub jobs_released: u64,
    pub release_time: Instant,
    /// Absolute deadline of the current job.
    pub deadline: Instant,
    pub response_times: Vec<Duration>,
    pub missed: bool,
    pub overruns: usize,
}

impl TaskState {
    pub fn is_pending(&self) -> bool {
        self.remaining > EPSILON
    }
}

/// Mutable per-run state of a component.
#[derive(Debug, Clone, Default)]
pub(super) struct ComponentState {
    pub budget_left: Service,
    pub replenishments: u64,
}

/// The arena of all per-run state, indexed like the system's arenas.
#[derive(Debug, Clone)]
pub(super) struct RunState {
    pub tasks: Vec<TaskState>,
    pub components: Vec<ComponentState>,
}

impl RunState {
    pub fn new(system: &System) -> Self {
        RunState {
            tasks: vec![TaskState::default(); system.tasks().len()],
            components: vec![ComponentState::default(); system.components().len()],
        }
    }
}

/// Scheduling key of a pending job; smaller is more urgent.
pub(super) type JobKey = fn(&Task, &TaskState) -> f64;

/// Scheduling key of an active server, given the earliest absolute
/// deadline among its pending jobs; smaller is more urgent.
pub(super) type ServerKey = fn(&Component, Instant) -> f64;

fn job_by_deadline(_: &Task, state: &TaskState) -> f64 {
    state.deadline
}

fn job_by_priority(task: &Task, _: &TaskState) -> f64 {
    task.priority as f64
}

fn server_by_deadline(_: &Component, earliest_deadline: Instant) -> f64 {
    earliest_deadline
}

fn server_by_priority(component: &Component, _: Instant) -> f64 {
    component.priority as f64
}

pub(super) fn job_key(policy: Policy) -> JobKey {
    match policy {
        Policy::EarliestDeadlineFirst => job_by_deadline,
        Policy::RateMonotonic => job_by_priority,
    }
}

pub(super) fn server_key(policy: Policy) -> ServerKey {
    match policy {
        Policy::EarliestDeadlineFirst => server_by_deadline,
        Policy::RateMonotonic => server_by_priority,
    }
}
