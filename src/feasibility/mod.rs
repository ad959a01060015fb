/*! Demand/supply feasibility of a component under a periodic resource

A component is feasible if, for every interval length `t` at one of its
critical points, the demand-bound function of its tasks does not exceed
the supply-bound function of the resource that serves it:

`DBF(t) ≤ SBF(t)`

The critical points are the job deadlines of all tasks (where the DBF
steps) and the multiples of the server's period and delay (where the
SBF changes slope), up to the hyperperiod of the tasks.
*/

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::demand::{ComponentDemand, DemandBound};
use crate::model::{ComponentId, ConfigurationError, System};
use crate::supply::SupplyBound;
use crate::time::{self, Duration, Service};

/// Counterexample returned when the demand exceeds the supply.
#[derive(Debug, Error, Clone, Copy, PartialEq, Serialize)]
#[error("demand {demand} exceeds supply {supply} in an interval of length {at}")]
pub struct Violation {
    pub at: Duration,
    pub demand: Service,
    pub supply: Service,
}

/// The outcome of a feasibility test.
pub type Verdict = Result<(), Violation>;

/// The interval lengths up to `horizon` at which `demand` steps.
pub fn critical_points<'a, DBF>(
    demand: &'a DBF,
    horizon: Duration,
) -> impl Iterator<Item = Duration> + 'a
where
    DBF: DemandBound + ?Sized,
{
    demand.steps_until(horizon)
}

/// The multiples of a server's `period` and of its `delay` up to
/// `horizon`, in increasing order.
pub fn server_points(
    period: Duration,
    delay: Duration,
    horizon: Duration,
) -> impl Iterator<Item = Duration> {
    let multiples = move |step: Duration| {
        (1u64..)
            .map(move |k| k as f64 * step)
            .take_while(move |t| step > 0.0 && time::approx_le(*t, horizon))
    };
    multiples(period)
        .merge_by(multiples(delay), |a, b| a <= b)
        .dedup_by(|a, b| time::approx_eq(*a, *b))
}

/// Check `DBF(t) ≤ SBF(t)` at each of the given `points` and report the
/// first violation.
pub fn check<DBF, SBF, I>(demand: &DBF, supply: &SBF, points: I) -> Verdict
where
    DBF: DemandBound + ?Sized,
    SBF: SupplyBound + ?Sized,
    I: IntoIterator<Item = Duration>,
{
    for at in points {
        let needed = demand.demand(at);
        let provided = supply.provided_service(at);
        if !time::approx_le(needed, provided) {
            return Err(Violation {
                at,
                demand: needed,
                supply: provided,
            });
        }
    }
    Ok(())
}

/// Check whether the tasks of a component are feasible under the
/// component's configured budget and period.
///
/// Fails if the hyperperiod of the component's tasks is not
/// representable.
pub fn check_component(system: &System, id: ComponentId) -> Result<Verdict, ConfigurationError> {
    let component = system.component(id);
    let horizon = component.horizon()?;
    let demand = ComponentDemand::of(system, id);
    let supply = component.supply();

    let points = critical_points(&demand, horizon)
        .merge(server_points(component.period, component.delay, horizon))
        .dedup_by(|a, b| time::approx_eq(*a, *b));
    let verdict = check(&demand, &supply, points);

    match &verdict {
        Ok(()) => info!(component = %component.name, "feasible under configured budget"),
        Err(v) => info!(
            component = %component.name,
            at = v.at,
            demand = v.demand,
            supply = v.supply,
            "infeasible under configured budget"
        ),
    }
    debug!(component = %component.name, horizon, "fixed-budget check done");
    Ok(verdict)
}

#[cfg(test)]
mod tests;
