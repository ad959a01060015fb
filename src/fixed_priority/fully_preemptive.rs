//! RTA for FP scheduling with fully preemptive jobs (**FP**)

use crate::demand::{self, RequestBound};
use crate::fixed_point;
use crate::supply::SupplyBound;
use crate::time::Duration;

/// Try to find a response-time bound for a task under fully-preemptive
/// fixed-priority scheduling on a processor that provides `supply`.
///
/// The analysis assumes that all tasks are independent, periodic, and
/// released synchronously. The total higher-priority interference is
/// represented by `interference`, the task under analysis by `tua`.
///
/// If no fixed point is found below the divergence limit given by
/// `limit`, return a [SearchFailure][fixed_point::SearchFailure]
/// instead.
pub fn rta<SBF, RBF>(
    supply: &SBF,
    interference: &RBF,
    tua: &demand::Periodic,
    limit: Duration,
) -> fixed_point::SearchResult
where
    SBF: SupplyBound + ?Sized,
    RBF: RequestBound + ?Sized,
{
    fixed_point::search(supply, tua.wcet, limit, |r| {
        tua.wcet + interference.service_needed(r)
    })
}

