use std::fmt;

use serde::Serialize;

use crate::bdr::{Bdr, Server};
use crate::feasibility::Violation;
use crate::model::Policy;
use crate::simulator;
use crate::time::Duration;

/// The result record of one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskReport {
    pub task_name: String,
    pub component_id: String,
    /// No simulated job missed its deadline.
    pub task_schedulable: bool,
    pub average_response_time: Duration,
    pub max_response_time: Duration,
    /// Configured bandwidth `Q/P` of the owning component.
    pub supply_utilization: f64,
    /// No task of the owning component missed a deadline.
    pub component_schedulable: bool,
    /// Hierarchical response-time bound under the configured budget;
    /// only for tasks of RM components, absent if the bound exceeds the
    /// deadline.
    pub response_time_bound: Option<Duration>,
}

/// Analytic verdicts for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentReport {
    pub component_id: String,
    pub core_id: String,
    pub scheduler: Policy,
    pub budget: f64,
    pub period: Duration,
    pub supply_utilization: f64,
    /// Utilization of the tasks, scaled to the core.
    pub demand_utilization: f64,
    /// Demand/supply test under the configured budget.
    pub fixed_budget_schedulable: bool,
    pub violation: Option<Violation>,
    /// The minimal bounded-delay interface, if one exists.
    pub interface: Option<Bdr>,
    /// The half-half server of `interface`.
    pub server: Option<Server>,
    /// Why the component could not be analyzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Core-level verdicts for one core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreReport {
    pub core_id: String,
    pub scheduler: Policy,
    pub speed_factor: f64,
    /// Simulation horizon; absent if the core was not simulated.
    pub horizon: Option<Duration>,
    /// Servers as configured.
    pub configured_schedulable: bool,
    /// Servers obtained from the synthesized interfaces; absent if some
    /// component has none.
    pub synthesized_schedulable: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Everything [analyze][super::analyze] finds out about a system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemReport {
    pub tasks: Vec<TaskReport>,
    pub components: Vec<ComponentReport>,
    pub cores: Vec<CoreReport>,
    #[serde(skip)]
    pub simulations: Vec<simulator::CoreReport>,
}

impl SystemReport {
    pub fn all_schedulable(&self) -> bool {
        self.tasks.iter().all(|t| t.task_schedulable)
    }

    pub fn task(&self, name: &str) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.task_name == name)
    }

    pub fn component(&self, id: &str) -> Option<&ComponentReport> {
        self.components.iter().find(|c| c.component_id == id)
    }

    pub fn core(&self, id: &str) -> Option<&CoreReport> {
        self.cores.iter().find(|c| c.core_id == id)
    }
}

fn flag(b: bool) -> u8 {
    b as u8
}

impl fmt::Display for SystemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:<12} {:>5} {:>10} {:>10} {:>8} {:>5}",
            "task", "component", "sched", "avg_rt", "max_rt", "sup_util", "comp"
        )?;
        for t in &self.tasks {
            writeln!(
                f,
                "{:<12} {:<12} {:>5} {:>10.3} {:>10.3} {:>8.3} {:>5}",
                t.task_name,
                t.component_id,
                flag(t.task_schedulable),
                t.average_response_time,
                t.max_response_time,
                t.supply_utilization,
                flag(t.component_schedulable)
            )?;
        }

        writeln!(f)?;
        for c in &self.components {
            write!(
                f,
                "component {} ({}, Q={}, P={}): fixed budget {}",
                c.component_id,
                c.scheduler,
                c.budget,
                c.period,
                if c.fixed_budget_schedulable {
                    "feasible"
                } else {
                    "infeasible"
                }
            )?;
            match (&c.interface, &c.server) {
                (Some(bdr), Some(server)) => writeln!(
                    f,
                    ", interface alpha={:.3} delta={:.3} -> server (Q={:.3}, P={}, D={:.3})",
                    bdr.alpha, bdr.delay, server.budget, server.period, server.deadline
                )?,
                _ => writeln!(f, ", no feasible interface")?,
            }
            if let Some(e) = &c.error {
                writeln!(f, "  error: {}", e)?;
            }
        }

        writeln!(f)?;
        for c in &self.cores {
            let synthesized = match c.synthesized_schedulable {
                Some(true) => "schedulable",
                Some(false) => "not schedulable",
                None => "n/a",
            };
            writeln!(
                f,
                "core {} ({}, speed {}): configured servers {}, synthesized servers {}",
                c.core_id,
                c.scheduler,
                c.speed_factor,
                if c.configured_schedulable {
                    "schedulable"
                } else {
                    "not schedulable"
                },
                synthesized
            )?;
            for e in &c.errors {
                writeln!(f, "  error: {}", e)?;
            }
        }
        Ok(())
    }
}
