use thiserror::Error;
use tracing::trace;

use crate::supply::SupplyBound;
use crate::time::{self, Duration, Service};

/// Error type returned when a fixed point search fails.
#[derive(Debug, Error, Copy, Clone, PartialEq, PartialOrd)]
pub enum SearchFailure {
    /// No fixed point found below the given divergence threshold.
    #[error("no fixed point less than {limit} found (last candidate {last})")]
    DivergenceLimitExceeded { limit: Duration, last: Duration },
}

pub type SearchResult = Result<Duration, SearchFailure>;

/// Conduct an iterative fixed point search up to a given divergence
/// threshold.
///
/// Starting from the time the supply needs to provide `initial`, the
/// search repeatedly evaluates the `workload` that must be served
/// within the currently assumed response time and converts it into a
/// new response-time candidate via [SupplyBound::service_time]. The
/// workload is assumed to be monotonically non-decreasing, so the
/// candidates never decrease. The search stops when two consecutive
/// candidates agree (the least fixed point) or when a candidate exceeds
/// `divergence_limit`.
pub fn search<SBF, RHS>(
    supply: &SBF,
    initial: Service,
    divergence_limit: Duration,
    workload: RHS,
) -> SearchResult
where
    SBF: SupplyBound + ?Sized,
    RHS: Fn(Duration) -> Service,
{
    let mut assumed_response_time = supply.service_time(initial);
    while time::approx_le(assumed_response_time, divergence_limit) {
        let demand = workload(assumed_response_time);
        let response_time_bound = supply.service_time(demand);
        trace!(assumed_response_time, response_time_bound, "fixed-point step");
        if time::approx_le(response_time_bound, assumed_response_time) {
            // we have converged
            return Ok(response_time_bound);
        } else {
            // continue iterating
            assumed_response_time = response_time_bound
        }
    }
    // if we get here, we failed to converge => no solution
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
        last: assumed_response_time,
    })
}
