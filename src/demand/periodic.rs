use super::{DemandBound, RequestBound};
use crate::model::Task;
use crate::time::{self, Duration, Service};

/// The demand of a periodic task with a constrained relative deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Periodic {
    /// Execution demand of a single job, already scaled to the core.
    pub wcet: Service,
    pub period: Duration,
    pub deadline: Duration,
}

impl Periodic {
    /// A task with an implicit deadline.
    pub fn new(wcet: Service, period: Duration) -> Self {
        Self::with_deadline(wcet, period, period)
    }

    pub fn with_deadline(wcet: Service, period: Duration, deadline: Duration) -> Self {
        assert!(period > 0.0);
        assert!(deadline > 0.0);
        Periodic {
            wcet,
            period,
            deadline,
        }
    }

    /// The demand of `task` when hosted on a core with the given speed
    /// factor.
    pub fn of_task(task: &Task, speed_factor: f64) -> Self {
        Self::with_deadline(task.scaled_wcet(speed_factor), task.period, task.deadline)
    }

    /// Number of jobs released in an interval of length `delta`.
    pub fn jobs_released(&self, delta: Duration) -> f64 {
        if delta <= 0.0 {
            0.0
        } else {
            time::ceil_div(delta, self.period)
        }
    }

    /// Number of job deadlines in an interval of length `delta`.
    pub fn deadlines_within(&self, delta: Duration) -> f64 {
        if !time::approx_le(self.deadline, delta) {
            0.0
        } else {
            (time::floor_div(delta - self.deadline, self.period) + 1.0).max(0.0)
        }
    }

    pub fn utilization(&self) -> f64 {
        self.wcet / self.period
    }
}

impl RequestBound for Periodic {
    fn service_needed(&self, delta: Duration) -> Service {
        self.jobs_released(delta) * self.wcet
    }
}

impl DemandBound for Periodic {
    fn demand(&self, delta: Duration) -> Service {
        self.deadlines_within(delta) * self.wcet
    }

    fn steps_until<'a>(&'a self, horizon: Duration) -> Box<dyn Iterator<Item = Duration> + 'a> {
        Box::new(
            (0u64..)
                .map(move |k| self.deadline + k as f64 * self.period)
                .take_while(move |t| time::approx_le(*t, horizon)),
        )
    }
}
