use assert_approx_eq::assert_approx_eq;

use crate::demand::{self, ComponentDemand};
use crate::feasibility::{self, Violation};
use crate::supply;
use crate::model::ConfigurationError;
use crate::tests::{
    build, component, core, prio_task, records, task, two_component_example, EDF, RM,
};

#[test]
fn server_points_merge_period_and_delay() {
    let points: Vec<_> = feasibility::server_points(10.0, 6.0, 30.0).collect();
    assert_eq!(points, vec![6.0, 10.0, 12.0, 18.0, 20.0, 24.0, 30.0]);

    // a full-budget server has no delay
    let points: Vec<_> = feasibility::server_points(5.0, 0.0, 15.0).collect();
    assert_eq!(points, vec![5.0, 10.0, 15.0]);
}

#[test]
fn first_violation_is_reported() {
    let tasks = vec![demand::Periodic::new(3.0, 10.0)];
    let dbf = demand::Aggregate::new(tasks);
    let sbf = supply::Periodic::new(4.0, 10.0);
    let points = feasibility::critical_points(&dbf, 20.0);
    let violation = feasibility::check(&dbf, &sbf, points).unwrap_err();
    assert_eq!(violation.at, 10.0);
    assert_eq!(violation.demand, 3.0);
    assert_approx_eq!(violation.supply, 1.6);
}

#[test]
fn dedicated_supply_accepts_full_utilization() {
    let tasks = vec![
        demand::Periodic::new(1.0, 2.0),
        demand::Periodic::new(1.0, 4.0),
        demand::Periodic::new(1.0, 4.0),
    ];
    let dbf = demand::Aggregate::new(tasks);
    let points = feasibility::critical_points(&dbf, 4.0);
    assert_eq!(
        feasibility::check(&dbf, &supply::Dedicated::new(), points),
        Ok(())
    );

    let overloaded = vec![demand::Periodic::new(3.0, 4.0), demand::Periodic::new(1.0, 2.0)];
    let dbf = demand::Aggregate::new(overloaded);
    let points = feasibility::critical_points(&dbf, 4.0);
    assert_eq!(
        feasibility::check(&dbf, &supply::Dedicated::new(), points),
        Err(Violation {
            at: 4.0,
            demand: 5.0,
            supply: 4.0
        })
    );
}

#[test]
fn two_component_example_is_feasible() {
    let sys = build(&two_component_example());
    for id in sys.component_ids() {
        assert_eq!(feasibility::check_component(&sys, id), Ok(Ok(())));
    }
}

#[test]
fn infeasible_component_under_configured_budget() {
    let sys = build(&records(
        vec![task("a", 3.0, 10.0, "C"), task("b", 1.0, 5.0, "D")],
        vec![
            component("C", EDF, 4.0, 10.0, "P", None),
            component("D", RM, 2.0, 5.0, "P", None),
        ],
        vec![core("P", 1.0, RM)],
    ));
    let c = sys.component_by_name("C").unwrap();
    let violation = feasibility::check_component(&sys, c).unwrap().unwrap_err();
    assert_eq!(violation.at, 10.0);
    assert_eq!(violation.demand, 3.0);

    // budget 2 every 5: delay 3, SBF(5) = 0.8 < 1
    let d = sys.component_by_name("D").unwrap();
    assert!(feasibility::check_component(&sys, d).unwrap().is_err());
}

#[test]
fn faster_core_makes_component_feasible() {
    let sys = build(&records(
        vec![task("a", 3.0, 10.0, "C")],
        vec![component("C", EDF, 4.0, 10.0, "P", None)],
        vec![core("P", 2.0, EDF)],
    ));
    let c = sys.component_by_name("C").unwrap();
    let dbf = ComponentDemand::of(&sys, c);
    assert_approx_eq!(dbf.utilization(), 0.15);
    // scaled cost 1.5 ≤ SBF(10) = 1.6
    assert_eq!(feasibility::check_component(&sys, c), Ok(Ok(())));
}

#[test]
fn empty_component_is_feasible() {
    let sys = build(&records(
        vec![],
        vec![component("C", EDF, 0.0, 10.0, "P", None)],
        vec![core("P", 1.0, EDF)],
    ));
    let c = sys.component_by_name("C").unwrap();
    assert_eq!(feasibility::check_component(&sys, c), Ok(Ok(())));
}

#[test]
fn rm_component_has_no_demand_before_first_deadline() {
    // the first server point (t = 6) precedes the task's deadline
    let sys = build(&records(
        vec![prio_task("a", 2.0, 20.0, 1, "C")],
        vec![component("C", RM, 4.0, 10.0, "P", None)],
        vec![core("P", 1.0, RM)],
    ));
    let c = sys.component_by_name("C").unwrap();
    assert_eq!(feasibility::check_component(&sys, c), Ok(Ok(())));
}

#[test]
fn unrepresentable_horizon_is_an_error() {
    let sys = build(&records(
        vec![task("a", 0.1, 1.0 / 3.0, "C"), task("b", 1.0, 10.0, "D")],
        vec![
            component("C", EDF, 5.0, 10.0, "P", None),
            component("D", EDF, 5.0, 10.0, "P", None),
        ],
        vec![core("P", 1.0, EDF)],
    ));
    let c = sys.component_by_name("C").unwrap();
    assert!(matches!(
        feasibility::check_component(&sys, c),
        Err(ConfigurationError::HyperperiodOverflow { .. })
    ));
    let d = sys.component_by_name("D").unwrap();
    assert_eq!(feasibility::check_component(&sys, d), Ok(Ok(())));
}
