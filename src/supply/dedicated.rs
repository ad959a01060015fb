use super::SupplyBound;
use crate::time::{Duration, Service};

/// A core that is never taken away from its client: every interval of
/// length `delta` provides exactly `delta` units of service.
///
/// This is the supply seen by a flat task set, or by a component whose
/// budget equals its period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dedicated;

impl Dedicated {
    pub fn new() -> Self {
        Dedicated
    }
}

impl SupplyBound for Dedicated {
    fn provided_service(&self, delta: Duration) -> Service {
        delta.max(0.0)
    }

    fn service_time(&self, demand: Service) -> Duration {
        demand.max(0.0)
    }
}
