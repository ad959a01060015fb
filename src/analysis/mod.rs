/*! The complete analysis pipeline

[analyze] simulates every core, runs the analytic tests for every
component (demand/supply feasibility under the configured budget,
interface synthesis, hierarchical RTA for RM components) and the
core-level test for the configured and the synthesized servers of every
core, and collects all findings in a [SystemReport].
*/

use thiserror::Error;
use tracing::{info, warn};

use crate::bdr::{self, Server};
use crate::config::AnalysisConfig;
use crate::demand::ComponentDemand;
use crate::feasibility;
use crate::fixed_priority;
use crate::model::{ComponentId, ConfigurationError, Policy, System, TaskId};
use crate::server;
use crate::simulator::{self, SimulationInconsistency, TaskStats};
use crate::time::Duration;

mod report;

pub use report::{ComponentReport, CoreReport, SystemReport, TaskReport};

/// Error type of the analysis pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Simulation(#[from] SimulationInconsistency),
}

/// Hierarchical response-time bounds of the tasks of an RM component
/// under its configured budget, in the component's task order. `None`
/// for EDF components.
pub fn component_response_times(
    system: &System,
    id: ComponentId,
) -> Option<Vec<Option<Duration>>> {
    let component = system.component(id);
    if component.policy != Policy::RateMonotonic {
        return None;
    }
    let speed = system.speed_of(id);
    let tasks: Vec<fixed_priority::Task> = component
        .tasks
        .iter()
        .map(|t| {
            let task = system.task(*t);
            fixed_priority::Task {
                wcet: task.scaled_wcet(speed),
                period: task.period,
                deadline: task.deadline,
                priority: task.priority,
            }
        })
        .collect();
    Some(fixed_priority::response_times_under(
        &component.supply(),
        &tasks,
    ))
}

fn analyze_component(system: &System, id: ComponentId, alpha_step: f64) -> ComponentReport {
    let component = system.component(id);
    let mut error = None;
    let violation = match feasibility::check_component(system, id) {
        Ok(verdict) => verdict.err(),
        Err(e) => {
            warn!(component = %component.name, "{}", e);
            error = Some(e.to_string());
            None
        }
    };
    let interface = bdr::synthesize_component(system, id, alpha_step).ok();
    let demand = ComponentDemand::of(system, id);
    ComponentReport {
        component_id: component.name.clone(),
        core_id: system.core(component.core).name.clone(),
        scheduler: component.policy,
        budget: component.budget,
        period: component.period,
        supply_utilization: component.supply_utilization(),
        demand_utilization: demand.utilization(),
        fixed_budget_schedulable: error.is_none() && violation.is_none(),
        violation,
        interface,
        server: interface.map(|i| i.to_server(component.period)),
        error,
    }
}

/// Run the complete analysis of `system`.
///
/// Cores and components whose hyperperiod is not representable are
/// reported with an error; all others are analyzed as usual.
pub fn analyze(system: &System, config: &AnalysisConfig) -> Result<SystemReport, Error> {
    config.validate()?;

    let mut simulations: Vec<Option<simulator::CoreReport>> =
        Vec::with_capacity(system.cores().len());
    let mut core_errors: Vec<Vec<String>> = vec![Vec::new(); system.cores().len()];
    let mut stats: Vec<Option<TaskStats>> = vec![None; system.tasks().len()];
    for core in system.core_ids() {
        match simulator::simulate_core(system, core, config) {
            Ok(report) => {
                for s in &report.tasks {
                    stats[s.task.index()] = Some(s.clone());
                }
                simulations.push(Some(report));
            }
            Err(e @ SimulationInconsistency::UndefinedHorizon(_)) => {
                warn!(core = %system.core(core).name, "{}", e);
                core_errors[core.index()].push(e.to_string());
                simulations.push(None);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let components: Vec<ComponentReport> = system
        .component_ids()
        .map(|c| analyze_component(system, c, config.alpha_step))
        .collect();

    let cores = system
        .core_ids()
        .zip(&simulations)
        .zip(core_errors)
        .map(|((id, simulation), mut errors)| {
            let core = system.core(id);
            let configured: Vec<Server> = core
                .components
                .iter()
                .map(|c| Server::configured(system.component(*c)))
                .collect();
            let synthesized: Option<Vec<Server>> = core
                .components
                .iter()
                .map(|c| components[c.index()].server)
                .collect();
            let (configured_schedulable, synthesized_schedulable) = match core.server_horizon() {
                Ok(horizon) => (
                    server::schedulable(core.policy, &configured, horizon).is_ok(),
                    synthesized
                        .map(|servers| server::schedulable(core.policy, &servers, horizon).is_ok()),
                ),
                Err(e) => {
                    warn!(core = %core.name, "{}", e);
                    errors.push(e.to_string());
                    (false, None)
                }
            };
            info!(
                core = %core.name,
                configured_schedulable,
                ?synthesized_schedulable,
                "core-level verdict"
            );
            CoreReport {
                core_id: core.name.clone(),
                scheduler: core.policy,
                speed_factor: core.speed_factor,
                horizon: simulation.as_ref().map(|s| s.horizon),
                configured_schedulable,
                synthesized_schedulable,
                errors,
            }
        })
        .collect();

    let mut bounds: Vec<Option<Duration>> = vec![None; system.tasks().len()];
    for c in system.component_ids() {
        if let Some(found) = component_response_times(system, c) {
            for (t, bound) in system.component(c).tasks.iter().zip(found) {
                bounds[t.index()] = bound;
            }
        }
    }

    // unsimulated tasks are not reported as schedulable
    let flagged = |t: &TaskId| stats[t.index()].as_ref().map_or(true, |s| s.missed);
    let component_ok: Vec<bool> = system
        .components()
        .iter()
        .map(|c| !c.tasks.iter().any(flagged))
        .collect();

    let tasks = system
        .task_ids()
        .map(|id| {
            let task = system.task(id);
            let component = system.component(task.component);
            let (average, max) = match &stats[id.index()] {
                Some(s) => (s.average_response_time, s.max_response_time),
                None => (0.0, 0.0),
            };
            let missed = flagged(&id);
            if missed {
                warn!(task = %task.name, "deadline missed or not simulated");
            }
            TaskReport {
                task_name: task.name.clone(),
                component_id: component.name.clone(),
                task_schedulable: !missed,
                average_response_time: average,
                max_response_time: max,
                supply_utilization: component.supply_utilization(),
                component_schedulable: component_ok[task.component.index()],
                response_time_bound: bounds[id.index()],
            }
        })
        .collect();

    Ok(SystemReport {
        tasks,
        components,
        cores,
        simulations: simulations.into_iter().flatten().collect(),
    })
}
