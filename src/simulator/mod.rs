/*! Discrete-event simulation of the two-level schedule of one core

The simulator maintains a time-ordered queue of *release* events (a
task's next job becomes ready) and *replenish* events (a component's
budget is reset to `Q`). All events of an instant are applied before
any scheduling decision; replenishments come first, then releases, each
in index order. Between two events, the core repeatedly

1. selects the most urgent *active* component (positive remaining
   budget and at least one pending job) according to the core's policy,
2. selects the most urgent pending job of that component according to
   the component's policy, and
3. runs it until it completes, the budget is exhausted, or the next
   event or the horizon is reached.

Equal scheduling keys are resolved in favor of the lower index. All
mutable state lives in a fresh arena per run, so repeated runs of the
same [Simulator] are independent.
*/

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::config::AnalysisConfig;
use crate::model::{ComponentId, ConfigurationError, CoreId, System, TaskId};
use crate::time::{self, Duration, Instant, EPSILON};

mod event;
mod execution;
mod state;
mod trace_event;

pub use execution::{ExecutionMode, ExecutionTime, Uniform, WorstCase};
pub use trace_event::TraceEvent;

use event::{Event, EventKind};
use state::{JobKey, RunState, ServerKey};

/// Error type returned when a run violates a structural invariant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationInconsistency {
    #[error("invalid simulation horizon {0}")]
    InvalidHorizon(Duration),
    #[error("no default simulation horizon: {0}")]
    UndefinedHorizon(ConfigurationError),
    #[error("event at {event} precedes the current time {now}")]
    TimeWentBackwards { now: Instant, event: Instant },
    #[error("component `{component}` consumed more than its budget at {at}")]
    BudgetExceeded { component: String, at: Instant },
}

/// The outcome of one run for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRun {
    pub task: TaskId,
    /// Response times of all completed jobs, in completion order.
    pub response_times: Vec<Duration>,
    pub missed: bool,
    pub overruns: usize,
}

/// The outcome of one run of a core.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// One entry per task of the core, in index order.
    pub tasks: Vec<TaskRun>,
    /// Empty unless trace recording is enabled.
    pub trace: Vec<TraceEvent>,
}

/// Simulator of one core of a system up to a fixed horizon.
pub struct Simulator<'a> {
    system: &'a System,
    core: CoreId,
    horizon: Duration,
    record_trace: bool,
    server_key: ServerKey,
    // indexed by component
    job_keys: Vec<JobKey>,
}

impl<'a> Simulator<'a> {
    pub fn new(system: &'a System, core: CoreId, horizon: Duration) -> Self {
        Simulator {
            system,
            core,
            horizon,
            record_trace: false,
            server_key: state::server_key(system.core(core).policy),
            job_keys: system
                .components()
                .iter()
                .map(|c| state::job_key(c.policy))
                .collect(),
        }
    }

    /// Enable or disable recording of an execution trace.
    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// The tasks hosted on the simulated core, in index order.
    pub fn tasks(&self) -> Vec<TaskId> {
        let mut tasks: Vec<TaskId> = self
            .system
            .core(self.core)
            .components
            .iter()
            .flat_map(|c| self.system.component(*c).tasks.iter().copied())
            .collect();
        tasks.sort();
        tasks
    }

    /// Simulate the core once, starting from a fresh state.
    pub fn run<E>(&self, exec: &mut E) -> Result<Run, SimulationInconsistency>
    where
        E: ExecutionTime + ?Sized,
    {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(SimulationInconsistency::InvalidHorizon(self.horizon));
        }
        let mut execution = Execution {
            sim: self,
            state: RunState::new(self.system),
            queue: BinaryHeap::new(),
            clock: 0.0,
            trace: Vec::new(),
        };
        execution.simulate(exec)?;
        Ok(execution.finish())
    }
}

// One run in progress.
struct Execution<'s, 'a> {
    sim: &'s Simulator<'a>,
    state: RunState,
    queue: BinaryHeap<Reverse<Event>>,
    clock: Instant,
    trace: Vec<TraceEvent>,
}

impl<'s, 'a> Execution<'s, 'a> {
    fn record(&mut self, event: TraceEvent) {
        if self.sim.record_trace {
            self.trace.push(event);
        }
    }

    fn simulate<E>(&mut self, exec: &mut E) -> Result<(), SimulationInconsistency>
    where
        E: ExecutionTime + ?Sized,
    {
        let system = self.sim.system;
        let horizon = self.sim.horizon;
        for c in &system.core(self.sim.core).components {
            self.queue.push(Reverse(Event {
                at: 0.0,
                kind: EventKind::Replenish(*c),
            }));
            for t in &system.component(*c).tasks {
                self.queue.push(Reverse(Event {
                    at: 0.0,
                    kind: EventKind::Release(*t),
                }));
            }
        }

        while let Some(Reverse(first)) = self.queue.pop() {
            if !time::approx_le(self.clock, first.at) {
                return Err(SimulationInconsistency::TimeWentBackwards {
                    now: self.clock,
                    event: first.at,
                });
            }
            if time::approx_le(horizon, first.at) {
                break;
            }
            self.clock = first.at;

            let mut batch = vec![first];
            while self
                .queue
                .peek()
                .map_or(false, |Reverse(e)| time::approx_eq(e.at, first.at))
            {
                if let Some(Reverse(e)) = self.queue.pop() {
                    batch.push(e);
                }
            }
            batch.sort_by(event::apply_order);
            for ev in batch {
                match ev.kind {
                    EventKind::Replenish(c) => self.replenish(c),
                    EventKind::Release(t) => self.release(t, exec),
                }
            }

            let until = self
                .queue
                .peek()
                .map_or(horizon, |Reverse(e)| e.at.min(horizon));
            self.dispatch(until)?;
        }
        Ok(())
    }

    fn replenish(&mut self, id: ComponentId) {
        let system = self.sim.system;
        let component = system.component(id);
        let state = &mut self.state.components[id.index()];
        let unused = state.budget_left;
        state.budget_left = component.budget;
        state.replenishments += 1;
        let next = state.replenishments as f64 * component.period;
        trace!(component = %component.name, at = self.clock, unused, "replenish");
        self.record(TraceEvent::Replenished {
            component: id,
            at: self.clock,
            unused,
        });
        self.queue.push(Reverse(Event {
            at: next,
            kind: EventKind::Replenish(id),
        }));
    }

    fn release<E>(&mut self, id: TaskId, exec: &mut E)
    where
        E: ExecutionTime + ?Sized,
    {
        let system = self.sim.system;
        let task = system.task(id);
        let now = self.clock;

        if self.state.tasks[id.index()].is_pending() {
            let state = &mut self.state.tasks[id.index()];
            state.missed = true;
            state.overruns += 1;
            warn!(task = %task.name, at = now, "job overrun, discarding pending job");
            self.record(TraceEvent::Overrun { task: id, at: now });
        }

        let cost = exec.job_cost(task) / system.speed_of(task.component);
        let state = &mut self.state.tasks[id.index()];
        state.remaining = cost;
        state.release_time = now;
        state.deadline = now + task.deadline;
        state.jobs_released += 1;
        let next = state.jobs_released as f64 * task.period;
        trace!(task = %task.name, at = now, cost, "release");
        self.queue.push(Reverse(Event {
            at: next,
            kind: EventKind::Release(id),
        }));

        if cost <= EPSILON {
            self.complete(id);
        }
    }

    fn complete(&mut self, id: TaskId) {
        let system = self.sim.system;
        let task = system.task(id);
        let now = self.clock;
        let state = &mut self.state.tasks[id.index()];
        state.remaining = 0.0;
        let response_time = now - state.release_time;
        state.response_times.push(response_time);
        if !time::approx_le(response_time, task.deadline) {
            state.missed = true;
            warn!(task = %task.name, at = now, response_time, "deadline miss");
        }
        trace!(task = %task.name, at = now, response_time, "completion");
        self.record(TraceEvent::Completed {
            task: id,
            at: now,
            response_time,
        });
    }

    // The most urgent pending job of the most urgent active component.
    fn select(&self) -> Option<(ComponentId, TaskId)> {
        let system = self.sim.system;
        let mut best: Option<(ComponentId, f64)> = None;
        for c in &system.core(self.sim.core).components {
            if self.state.components[c.index()].budget_left <= EPSILON {
                continue;
            }
            let component = system.component(*c);
            let earliest_deadline = component
                .tasks
                .iter()
                .map(|t| &self.state.tasks[t.index()])
                .filter(|s| s.is_pending())
                .map(|s| s.deadline)
                .min_by(f64::total_cmp);
            if let Some(deadline) = earliest_deadline {
                let key = (self.sim.server_key)(component, deadline);
                if best.map_or(true, |(_, k)| key.total_cmp(&k) == Ordering::Less) {
                    best = Some((*c, key));
                }
            }
        }
        let (c, _) = best?;

        let job_key = self.sim.job_keys[c.index()];
        let mut chosen: Option<(TaskId, f64)> = None;
        for t in &system.component(c).tasks {
            let state = &self.state.tasks[t.index()];
            if !state.is_pending() {
                continue;
            }
            let key = job_key(system.task(*t), state);
            if chosen.map_or(true, |(_, k)| key.total_cmp(&k) == Ordering::Less) {
                chosen = Some((*t, key));
            }
        }
        chosen.map(|(t, _)| (c, t))
    }

    fn dispatch(&mut self, until: Instant) -> Result<(), SimulationInconsistency> {
        let system = self.sim.system;
        while !time::approx_le(until, self.clock) {
            let (c, t) = match self.select() {
                Some(choice) => choice,
                None => {
                    trace!(from = self.clock, until, "idle");
                    break;
                }
            };
            let start = self.clock;
            let budget_left = self.state.components[c.index()].budget_left;
            let remaining = self.state.tasks[t.index()].remaining;
            let gap = until - start;
            let run = budget_left.min(remaining).min(gap);
            let end = if run < gap { start + run } else { until };

            self.state.components[c.index()].budget_left -= run;
            self.state.tasks[t.index()].remaining -= run;
            self.clock = end;
            debug!(
                component = %system.component(c).name,
                task = %system.task(t).name,
                start,
                end,
                "execute"
            );
            self.record(TraceEvent::Executed {
                component: c,
                task: t,
                start,
                end,
            });

            if !self.state.tasks[t.index()].is_pending() {
                self.complete(t);
            }
            let budget = &mut self.state.components[c.index()].budget_left;
            if *budget < -EPSILON {
                return Err(SimulationInconsistency::BudgetExceeded {
                    component: system.component(c).name.clone(),
                    at: end,
                });
            }
            if *budget <= EPSILON {
                *budget = 0.0;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Run {
        let system = self.sim.system;
        let horizon = self.sim.horizon;
        let tasks = self
            .sim
            .tasks()
            .into_iter()
            .map(|id| {
                let state = &mut self.state.tasks[id.index()];
                if state.is_pending() && time::approx_le(state.deadline, horizon) {
                    state.missed = true;
                    warn!(task = %system.task(id).name, deadline = state.deadline, "job unfinished at end of run");
                }
                TaskRun {
                    task: id,
                    response_times: std::mem::take(&mut state.response_times),
                    missed: state.missed,
                    overruns: state.overruns,
                }
            })
            .collect();
        Run {
            tasks,
            trace: self.trace,
        }
    }
}

/// Response-time statistics of one task, accumulated over runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStats {
    pub task: TaskId,
    pub completed_jobs: usize,
    pub average_response_time: Duration,
    pub max_response_time: Duration,
    /// Sticky: set if any run missed a deadline.
    pub missed: bool,
    pub overruns: usize,
    /// The configured bandwidth `Q/P` of the owning component.
    pub supply_utilization: f64,
    total_response_time: Duration,
}

impl TaskStats {
    pub fn new(task: TaskId, supply_utilization: f64) -> Self {
        TaskStats {
            task,
            completed_jobs: 0,
            average_response_time: 0.0,
            max_response_time: 0.0,
            missed: false,
            overruns: 0,
            supply_utilization,
            total_response_time: 0.0,
        }
    }

    /// Fold the outcome of one more run into the statistics.
    pub fn absorb(&mut self, run: &TaskRun) {
        for r in &run.response_times {
            self.total_response_time += r;
            self.max_response_time = self.max_response_time.max(*r);
        }
        self.completed_jobs += run.response_times.len();
        if self.completed_jobs > 0 {
            self.average_response_time = self.total_response_time / self.completed_jobs as f64;
        }
        self.missed |= run.missed;
        self.overruns += run.overruns;
    }
}

/// Simulation results of one core.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreReport {
    pub core: CoreId,
    pub horizon: Duration,
    pub runs: usize,
    /// One entry per task of the core, in index order.
    pub tasks: Vec<TaskStats>,
    /// The trace of the last run, if requested.
    pub trace: Vec<TraceEvent>,
}

/// Simulate a core as often as `config` asks for and accumulate the
/// per-task statistics.
///
/// The horizon defaults to the hyperperiod of the core's tasks, which
/// must then be representable.
pub fn simulate_core(
    system: &System,
    core: CoreId,
    config: &AnalysisConfig,
) -> Result<CoreReport, SimulationInconsistency> {
    let horizon = match config.horizon {
        Some(h) => h,
        None => system
            .core(core)
            .horizon()
            .map_err(SimulationInconsistency::UndefinedHorizon)?,
    };
    let simulator = Simulator::new(system, core, horizon).with_trace(config.record_trace);
    let mut exec = config.execution.model();

    let mut tasks: Vec<TaskStats> = simulator
        .tasks()
        .into_iter()
        .map(|t| {
            let component = system.component(system.task(t).component);
            TaskStats::new(t, component.supply_utilization())
        })
        .collect();
    let mut trace = Vec::new();

    for i in 0..config.runs {
        let run = simulator.run(&mut exec)?;
        for (stats, outcome) in tasks.iter_mut().zip(&run.tasks) {
            stats.absorb(outcome);
        }
        debug!(core = %system.core(core).name, run = i, "simulation run done");
        trace = run.trace;
    }

    info!(
        core = %system.core(core).name,
        horizon,
        runs = config.runs,
        missed = tasks.iter().filter(|t| t.missed).count(),
        "simulated core"
    );
    Ok(CoreReport {
        core,
        horizon,
        runs: config.runs,
        tasks,
        trace,
    })
}
