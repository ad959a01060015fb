/*! Models of processor demand.

Two notions of demand are used in this crate:

- the *request-bound function* ([RequestBound]) bounds the cumulative
  execution requested by jobs *released* in an interval of length
  `delta`; it drives the fixed-point iteration of response-time
  analysis;
- the *demand-bound function* ([DemandBound]) bounds the cumulative
  execution of jobs that are released *and have their deadline* in an
  interval of length `delta`; it is compared against supply-bound
  functions in feasibility tests.

Both are provided for a single periodic task ([Periodic]), for sets of
tasks ([Aggregate]), for a task under fixed-priority scheduling
([FixedPriority]) and for all tasks of a component ([ComponentDemand]).
*/

use auto_impl::auto_impl;

use crate::time::{Duration, Service};

/// The general interface for request-bound functions.
#[auto_impl(&, Box, Rc)]
pub trait RequestBound {
    /// Bound the total amount of service requested by jobs released in
    /// an interval of length `delta`.
    fn service_needed(&self, delta: Duration) -> Service;
}

/// The general interface for demand-bound functions.
#[auto_impl(&, Box, Rc)]
pub trait DemandBound {
    /// Bound the total amount of service needed by jobs with both
    /// release and deadline in an interval of length `delta`.
    fn demand(&self, delta: Duration) -> Service;

    /// Yield, in increasing order, the interval lengths up to `horizon`
    /// at which [DemandBound::demand] steps.
    fn steps_until<'a>(&'a self, horizon: Duration) -> Box<dyn Iterator<Item = Duration> + 'a>;
}

mod aggregate;
mod component;
mod fixed_priority;
mod periodic;

pub use aggregate::Aggregate;
pub use component::ComponentDemand;
pub use fixed_priority::FixedPriority;
pub use periodic::Periodic;
