use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::model::Task;
use crate::time::Service;

/// Source of the execution demand of released jobs.
#[auto_impl(&mut, Box)]
pub trait ExecutionTime {
    /// Execution demand of the next job of `task` on a core with speed
    /// factor `1`.
    fn job_cost(&mut self, task: &Task) -> Service;
}

/// Every job executes for its task's WCET.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorstCase;

impl ExecutionTime for WorstCase {
    fn job_cost(&mut self, task: &Task) -> Service {
        task.wcet
    }
}

/// Job costs drawn uniformly from `[BCET, WCET]`, reproducible from the
/// seed.
#[derive(Debug, Clone)]
pub struct Uniform {
    rng: XorShift64,
}

impl Uniform {
    pub fn new(seed: u64) -> Self {
        Uniform {
            rng: XorShift64::new(seed),
        }
    }
}

impl ExecutionTime for Uniform {
    fn job_cost(&mut self, task: &Task) -> Service {
        task.bcet + (task.wcet - task.bcet) * self.rng.next_f64()
    }
}

/// Selects the execution-time model of a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Worst,
    Uniform {
        seed: u64,
    },
}

impl ExecutionMode {
    pub fn model(&self) -> Box<dyn ExecutionTime> {
        match *self {
            ExecutionMode::Worst => Box::new(WorstCase),
            ExecutionMode::Uniform { seed } => Box::new(Uniform::new(seed)),
        }
    }
}

// Simple xorshift for reproducible job costs.
#[derive(Debug, Clone)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        // the all-zero state is a fixed point
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
