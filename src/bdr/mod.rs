/*! Synthesis of minimal bounded-delay resource (**BDR**) interfaces

A BDR interface `(α, Δ)` abstracts the supply a component needs: in
any interval of length `t`, at least `α · (t - Δ)` units of service.
This module searches, per component, the smallest bandwidth `α` (and,
for that bandwidth, the smallest delay `Δ`) such that the component's
demand-bound function stays below the resulting supply-bound function
at every critical point. The interface is then turned into a periodic
server via the *half-half* transform.

The bandwidth grid is anchored at multiples of the step size, starting
with the first multiple not smaller than the component's utilization.
For a given `α`, the delay `Δ = max(0, P - α·P)` is the only candidate
that needs checking: a larger delay never increases the supply.
*/

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::demand::{ComponentDemand, DemandBound};
use crate::feasibility;
use crate::model::{Component, ComponentId, ConfigurationError, System};
use crate::supply::{self, BoundedDelay};
use crate::time::{self, Duration, Service};

/// The bandwidth granularity of the interface search.
pub const DEFAULT_ALPHA_STEP: f64 = 0.001;

/// A bounded-delay resource interface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bdr {
    /// Bandwidth, `0 ≤ alpha ≤ 1`.
    pub alpha: f64,
    /// Maximum service delay.
    pub delay: Duration,
}

impl Bdr {
    pub fn supply(&self) -> BoundedDelay {
        BoundedDelay::new(self.alpha, self.delay)
    }

    /// Apply the half-half transform for a server with the given
    /// replenishment period.
    pub fn to_server(&self, period: Duration) -> Server {
        Server::half_half(self, period)
    }
}

/// A periodic server `(Q, P, D)` as seen by the core-level scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Server {
    pub budget: Service,
    pub period: Duration,
    pub deadline: Duration,
}

impl Server {
    /// The half-half transform: `(α, Δ)` with period `P` becomes the
    /// server `(α·P, P, Δ)`.
    pub fn half_half(bdr: &Bdr, period: Duration) -> Self {
        Server {
            budget: bdr.alpha * period,
            period,
            deadline: bdr.delay,
        }
    }

    /// The server as configured for a component.
    pub fn configured(component: &Component) -> Self {
        Server {
            budget: component.budget,
            period: component.period,
            deadline: component.delay,
        }
    }

    pub fn utilization(&self) -> f64 {
        self.budget / self.period
    }

    pub fn supply(&self) -> supply::Periodic {
        supply::Periodic::with_delay(self.budget, self.period, self.deadline)
    }
}

/// Error type returned when no bandwidth up to `1` admits a feasible
/// interface.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("no feasible bounded-delay interface (utilization {utilization})")]
pub struct InfeasibleInterface {
    pub utilization: f64,
}

/// Error type returned by [synthesize_component].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthesisError {
    #[error(transparent)]
    Infeasible(#[from] InfeasibleInterface),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Search the minimal interface for `demand`, whose total utilization
/// is `utilization`, when served by a server with period `period`.
/// Critical points are taken from the demand's steps up to `horizon`.
pub fn synthesize<DBF>(
    demand: &DBF,
    utilization: f64,
    period: Duration,
    horizon: Duration,
    alpha_step: f64,
) -> Result<Bdr, InfeasibleInterface>
where
    DBF: DemandBound + ?Sized,
{
    assert!(alpha_step > 0.0 && alpha_step <= 1.0);
    assert!(period > 0.0);

    let points: Vec<Duration> = feasibility::critical_points(demand, horizon).collect();
    let first = time::ceil_div(utilization.max(0.0), alpha_step) as u64;
    let last = time::floor_div(1.0, alpha_step) as u64;

    for k in first..=last {
        let alpha = (k as f64 * alpha_step).min(1.0);
        let delay = (period - alpha * period).max(0.0);
        let candidate = Bdr { alpha, delay };
        match feasibility::check(demand, &candidate.supply(), points.iter().copied()) {
            Ok(()) => {
                debug!(alpha, delay, "interface found");
                return Ok(candidate);
            }
            Err(v) => debug!(alpha, at = v.at, "bandwidth rejected"),
        }
    }
    Err(InfeasibleInterface { utilization })
}

/// Search the minimal interface of a component, with job costs scaled
/// to the hosting core.
///
/// A component without tasks needs no bandwidth.
pub fn synthesize_component(
    system: &System,
    id: ComponentId,
    alpha_step: f64,
) -> Result<Bdr, SynthesisError> {
    let component = system.component(id);
    let demand = ComponentDemand::of(system, id);
    if demand.is_empty() {
        return Ok(Bdr {
            alpha: 0.0,
            delay: component.period,
        });
    }

    let result = synthesize(
        &demand,
        demand.utilization(),
        component.period,
        component.horizon()?,
        alpha_step,
    );
    match &result {
        Ok(bdr) => info!(
            component = %component.name,
            alpha = bdr.alpha,
            delay = bdr.delay,
            "synthesized interface"
        ),
        Err(e) => warn!(component = %component.name, utilization = e.utilization, "{}", e),
    }
    Ok(result?)
}

#[cfg(test)]
mod tests;
