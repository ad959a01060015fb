/*! The static system model: tasks, components (servers) and cores.

Raw configuration records ([SystemRecords]) are turned into a validated
[System] exactly once. The system is immutable afterwards; everything
that changes while a schedule is simulated lives in the simulator's own
per-run state. Entities refer to each other through the index types
[TaskId], [ComponentId] and [CoreId], which are positions in the
system's arenas.
*/

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::supply;
use crate::time::{Duration, Service};

mod records;
mod system;

pub use records::{ComponentRecord, CoreRecord, SystemRecords, TaskRecord};
pub use system::System;

/// Scheduling policy, used both inside components and at core level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Policy {
    /// Fixed priorities; lower number = higher priority.
    #[serde(rename = "RM", alias = "FPS")]
    #[display(fmt = "RM")]
    RateMonotonic,
    #[serde(rename = "EDF")]
    #[display(fmt = "EDF")]
    EarliestDeadlineFirst,
}

/// Index of a task in [System::tasks].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
#[display(fmt = "task#{}", _0)]
pub struct TaskId(usize);

/// Index of a component in [System::components].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
#[display(fmt = "component#{}", _0)]
pub struct ComponentId(usize);

/// Index of a core in [System::cores].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
#[display(fmt = "core#{}", _0)]
pub struct CoreId(usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl CoreId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A periodic task with implicit or constrained deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: String,
    pub bcet: Service,
    pub wcet: Service,
    pub period: Duration,
    /// Relative deadline; equals `period` unless configured otherwise.
    pub deadline: Duration,
    /// Resolved fixed priority (lower number = higher priority).
    pub priority: u32,
    pub component: ComponentId,
}

impl Task {
    /// Execution demand of one worst-case job on a core with the given
    /// speed factor.
    pub fn scaled_wcet(&self, speed_factor: f64) -> Service {
        self.wcet / speed_factor
    }

    pub fn utilization(&self) -> f64 {
        self.wcet / self.period
    }
}

/// A component, i.e., a periodic server hosting a set of tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub policy: Policy,
    /// Budget `Q` granted every `period`.
    pub budget: Service,
    /// Replenishment period `P`.
    pub period: Duration,
    /// The periodic-resource delay `Δ`; `P - Q` unless synthesized.
    pub delay: Duration,
    pub core: CoreId,
    /// Resolved core-level priority, relevant on RM cores.
    pub priority: u32,
    /// Owned tasks, in configuration order.
    pub tasks: Vec<TaskId>,
    /// Hyperperiod of the owned tasks' periods, if representable.
    pub hyperperiod: Option<Duration>,
}

impl Component {
    /// The fraction of the processor configured for this component (`Q/P`).
    pub fn supply_utilization(&self) -> f64 {
        self.budget / self.period
    }

    /// The supply provided by the configured budget.
    pub fn supply(&self) -> supply::Periodic {
        supply::Periodic::with_delay(self.budget, self.period, self.delay)
    }

    /// The analysis horizon of the component's tasks.
    pub fn horizon(&self) -> Result<Duration, ConfigurationError> {
        self.hyperperiod
            .ok_or_else(|| ConfigurationError::HyperperiodOverflow {
                scope: format!("the tasks of component `{}`", self.name),
            })
    }
}

/// A processor core.
#[derive(Debug, Clone, PartialEq)]
pub struct Core {
    pub name: String,
    pub speed_factor: f64,
    pub policy: Policy,
    /// Hosted components, in configuration order.
    pub components: Vec<ComponentId>,
    /// Hyperperiod of the periods of all tasks on this core, if
    /// representable.
    pub hyperperiod: Option<Duration>,
    /// Hyperperiod of the hosted components' server periods, if
    /// representable.
    pub server_hyperperiod: Option<Duration>,
}

impl Core {
    /// The default simulation horizon of the core.
    pub fn horizon(&self) -> Result<Duration, ConfigurationError> {
        self.hyperperiod
            .ok_or_else(|| ConfigurationError::HyperperiodOverflow {
                scope: format!("the tasks of core `{}`", self.name),
            })
    }

    /// The horizon of the core-level server test.
    pub fn server_horizon(&self) -> Result<Duration, ConfigurationError> {
        self.server_hyperperiod
            .ok_or_else(|| ConfigurationError::HyperperiodOverflow {
                scope: format!("the servers of core `{}`", self.name),
            })
    }
}

/// Error type returned when configuration records do not describe a
/// valid system.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("malformed system description: {0}")]
    Malformed(String),
    #[error("duplicate {kind} identifier `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("task `{task}` refers to unknown component `{component}`")]
    UnknownComponent { task: String, component: String },
    #[error("component `{component}` refers to unknown core `{core}`")]
    UnknownCore { component: String, core: String },
    #[error("{kind} `{id}`: invalid {field} ({value})")]
    InvalidParameter {
        kind: &'static str,
        id: String,
        field: &'static str,
        value: f64,
    },
    #[error("hyperperiod of {scope} is not representable")]
    HyperperiodOverflow { scope: String },
    #[error("invalid analysis option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: &'static str,
    },
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(e: serde_json::Error) -> Self {
        ConfigurationError::Malformed(e.to_string())
    }
}
