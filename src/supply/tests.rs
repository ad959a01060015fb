use assert_approx_eq::assert_approx_eq;

use crate::supply::{self, SupplyBound};

#[test]
fn periodic_supply() {
    // alpha = 0.4, delay = 6
    let r = supply::Periodic::new(4.0, 10.0);

    assert_eq!(r.delay, 6.0);
    assert_approx_eq!(r.alpha(), 0.4);
    assert_eq!(r.provided_service(0.0), 0.0);
    assert_eq!(r.provided_service(3.0), 0.0);
    assert_eq!(r.provided_service(6.0), 0.0);
    assert_approx_eq!(r.provided_service(7.0), 0.4);
    assert_approx_eq!(r.provided_service(16.0), 4.0);
    assert_approx_eq!(r.provided_service(26.0), 8.0);

    assert_eq!(r.service_time(0.0), 0.0);
    assert_approx_eq!(r.service_time(4.0), 16.0);
    assert_approx_eq!(r.service_time(2.0), 11.0);
}

#[test]
fn periodic_supply_inverse() {
    for period in 1..40 {
        for budget in 1..=period {
            let r = supply::Periodic::new(budget as f64, period as f64);
            for x in 1..200 {
                let demand = x as f64 * 0.5;
                let st = r.service_time(demand);
                assert_approx_eq!(r.provided_service(st), demand, 1e-9);
                assert!(r.provided_service(st - 0.01) < demand);
            }
        }
    }
}

#[test]
fn periodic_supply_with_delay() {
    let r = supply::Periodic::with_delay(2.0, 10.0, 3.0);
    assert_eq!(r.provided_service(3.0), 0.0);
    assert_approx_eq!(r.provided_service(13.0), 2.0);
    assert_eq!(r.linear_bound(), supply::BoundedDelay::new(0.2, 3.0));
}

#[test]
fn bounded_delay_supply() {
    let r = supply::BoundedDelay::new(0.5, 2.0);
    assert_eq!(r.provided_service(1.0), 0.0);
    assert_eq!(r.provided_service(2.0), 0.0);
    assert_approx_eq!(r.provided_service(4.0), 1.0);
    assert_approx_eq!(r.service_time(1.0), 4.0);

    let none = supply::BoundedDelay::new(0.0, 0.0);
    assert_eq!(none.provided_service(100.0), 0.0);
    assert!(none.service_time(1.0).is_infinite());
    assert_eq!(none.service_time(0.0), 0.0);
}

#[test]
fn full_bandwidth_equals_dedicated() {
    let bdr = supply::BoundedDelay::new(1.0, 0.0);
    let ded = supply::Dedicated::new();
    let full = supply::Periodic::new(5.0, 5.0);
    for x in 0..100 {
        let delta = x as f64 * 0.25;
        assert_eq!(bdr.provided_service(delta), ded.provided_service(delta));
        assert_eq!(full.provided_service(delta), ded.provided_service(delta));
        assert_eq!(bdr.service_time(delta), ded.service_time(delta));
    }
}

#[test]
fn supply_through_references() {
    fn first_service<S: SupplyBound>(s: S) -> f64 {
        s.service_time(1.0)
    }
    let r = supply::Periodic::new(1.0, 2.0);
    let boxed: Box<dyn SupplyBound> = Box::new(r);
    assert_eq!(first_service(&r), 3.0);
    assert_eq!(first_service(boxed), 3.0);
}
