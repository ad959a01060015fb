/*! Models of resource supply (dedicated processors, periodic servers,
bounded-delay resources).

This module provides the trait [SupplyBound], which models the notion of
a *supply-bound function* (SBF), as well as the types of supply that
occur in a two-level hierarchy. */

use auto_impl::auto_impl;

use crate::time::{Duration, Service};

/// Generic interface for models of processor supply.
#[auto_impl(&, Box, Rc)]
pub trait SupplyBound {
    /// Bound the minimum amount of service provided during an
    /// interval of length `delta`.
    fn provided_service(&self, delta: Duration) -> Service;

    /// Bound the maximum interval length during which the supply
    /// provides at least `demand` amount of service. Infinite if the
    /// supply never provides that much.
    fn service_time(&self, demand: Service) -> Duration;
}

mod bounded_delay;
mod dedicated;
mod periodic;

pub use bounded_delay::BoundedDelay;
pub use dedicated::Dedicated;
pub use periodic::Periodic;

#[cfg(test)]
mod tests;
