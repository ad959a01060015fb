use super::{BoundedDelay, SupplyBound};
use crate::time::{Duration, Service};

/// The periodic resource model of a server.
///
/// The client(s) of this supply is/are guaranteed `budget` time units of
/// processor service every `period` time units. The server is abstracted
/// as a [BoundedDelay] resource with bandwidth `budget / period` and delay
/// `delay`, which defaults to `period - budget`. This is not the linear
/// bound of Shin & Lee (RTSS 2003), whose delay is `2 · (period - budget)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Periodic {
    pub budget: Service,
    pub period: Duration,
    pub delay: Duration,
}

impl Periodic {
    /// Construct a new periodic supply, where `budget <= period`.
    pub fn new(budget: Service, period: Duration) -> Self {
        Self::with_delay(budget, period, period - budget)
    }

    /// Construct a periodic supply with an explicit delay parameter,
    /// e.g., a synthesized internal deadline.
    pub fn with_delay(budget: Service, period: Duration, delay: Duration) -> Self {
        assert!(budget >= 0.0 && budget <= period);
        assert!(delay >= 0.0);
        Periodic {
            budget,
            period,
            delay,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.budget / self.period
    }

    /// The linear bound that this supply is analyzed with.
    pub fn linear_bound(&self) -> BoundedDelay {
        BoundedDelay {
            alpha: self.alpha(),
            delay: self.delay,
        }
    }
}

impl SupplyBound for Periodic {
    fn provided_service(&self, delta: Duration) -> Service {
        self.linear_bound().provided_service(delta)
    }

    fn service_time(&self, demand: Service) -> Duration {
        self.linear_bound().service_time(demand)
    }
}
