use super::SupplyBound;
use crate::time::{Duration, Service};

/// The bounded-delay resource model of Mok et al.
///
/// A resource with bandwidth `alpha` and maximum delay `delay`
/// guarantees at least `alpha * (delta - delay)` units of service in any
/// interval of length `delta > delay`, and nothing in shorter intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedDelay {
    pub alpha: f64,
    pub delay: Duration,
}

impl BoundedDelay {
    /// Construct a new bounded-delay resource, where `0 <= alpha <= 1`
    /// and `delay >= 0`.
    pub fn new(alpha: f64, delay: Duration) -> Self {
        assert!((0.0..=1.0).contains(&alpha));
        assert!(delay >= 0.0);
        BoundedDelay { alpha, delay }
    }
}

impl SupplyBound for BoundedDelay {
    fn provided_service(&self, delta: Duration) -> Service {
        (self.alpha * (delta - self.delay)).max(0.0)
    }

    fn service_time(&self, demand: Service) -> Duration {
        if demand <= 0.0 {
            0.0
        } else if self.alpha <= 0.0 {
            Duration::INFINITY
        } else {
            self.delay + demand / self.alpha
        }
    }
}
