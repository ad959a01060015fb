use assert_approx_eq::assert_approx_eq;

use crate::bdr::{
    self, Bdr, InfeasibleInterface, Server, SynthesisError, DEFAULT_ALPHA_STEP,
};
use crate::demand::{ComponentDemand, DemandBound};
use crate::feasibility;
use crate::model::System;
use crate::tests::{
    build, component, core, prio_task, records, task, two_component_example, EDF, RM,
};

fn single_component(policy: crate::Policy, period: f64, params: &[(f64, f64)]) -> System {
    let tasks = params
        .iter()
        .enumerate()
        .map(|(i, (wcet, p))| task(&format!("T{}", i + 1), *wcet, *p, "C"))
        .collect();
    build(&records(
        tasks,
        vec![component("C", policy, period, period, "P", None)],
        vec![core("P", 1.0, EDF)],
    ))
}

#[test]
fn two_component_example_interfaces() {
    let sys = build(&two_component_example());
    let c1 = sys.component_by_name("C1").unwrap();
    let c2 = sys.component_by_name("C2").unwrap();

    let bdr1 = bdr::synthesize_component(&sys, c1, DEFAULT_ALPHA_STEP).unwrap();
    assert_approx_eq!(bdr1.alpha, 0.171);
    assert_approx_eq!(bdr1.delay, 8.29);

    let bdr2 = bdr::synthesize_component(&sys, c2, DEFAULT_ALPHA_STEP).unwrap();
    assert_approx_eq!(bdr2.alpha, 0.353);
    assert_approx_eq!(bdr2.delay, 6.47);

    // both fit into the configured budgets
    for (id, found) in [(c1, bdr1), (c2, bdr2)] {
        assert!(found.alpha <= sys.component(id).supply_utilization());
    }
}

#[test]
fn fixed_priority_interface_counts_deadlines_only() {
    let sys = build(&records(
        vec![
            prio_task("hi", 1.0, 5.0, 1, "C"),
            prio_task("lo", 1.0, 100.0, 2, "C"),
        ],
        vec![component("C", RM, 8.0, 10.0, "P", None)],
        vec![core("P", 1.0, EDF)],
    ));
    let c = sys.component_by_name("C").unwrap();
    let demand = ComponentDemand::of(&sys, c);
    assert_eq!(demand.demand(1.0), 0.0);
    assert_eq!(demand.demand(5.0), 1.0);
    assert_eq!(demand.demand(100.0), 21.0);

    // binding at t = 5: alpha * (5 - 10 * (1 - alpha)) >= 1
    let found = bdr::synthesize_component(&sys, c, DEFAULT_ALPHA_STEP).unwrap();
    assert_approx_eq!(found.alpha, 0.654);
    assert_approx_eq!(found.delay, 3.46);
}

#[test]
fn synthesized_interface_is_feasible() {
    let cases = [
        (EDF, 10.0, vec![(1.0, 5.0), (2.0, 10.0), (3.0, 20.0)]),
        (RM, 4.0, vec![(1.0, 8.0), (2.0, 16.0)]),
        (EDF, 2.5, vec![(0.1, 0.5), (0.2, 0.75)]),
    ];
    for (policy, period, params) in cases {
        let sys = single_component(policy, period, &params);
        let c = sys.component_by_name("C").unwrap();
        let found = bdr::synthesize_component(&sys, c, DEFAULT_ALPHA_STEP).unwrap();
        let demand = ComponentDemand::of(&sys, c);
        let horizon = sys.component(c).horizon().unwrap();
        assert_eq!(
            feasibility::check(
                &demand,
                &found.supply(),
                feasibility::critical_points(&demand, horizon)
            ),
            Ok(())
        );
        assert!(found.alpha + 1e-9 >= demand.utilization());

        // one step less bandwidth is not enough
        if found.alpha > demand.utilization() + DEFAULT_ALPHA_STEP {
            let smaller = Bdr {
                alpha: found.alpha - DEFAULT_ALPHA_STEP,
                delay: period - (found.alpha - DEFAULT_ALPHA_STEP) * period,
            };
            assert!(feasibility::check(
                &demand,
                &smaller.supply(),
                feasibility::critical_points(&demand, horizon)
            )
            .is_err());
        }
    }
}

#[test]
fn alpha_is_monotone_in_wcet() {
    for policy in [EDF, RM] {
        let mut last = 0.0;
        for x in 1..=12 {
            let wcet = x as f64 * 0.5;
            let sys = single_component(policy, 5.0, &[(1.0, 5.0), (wcet, 20.0)]);
            let c = sys.component_by_name("C").unwrap();
            match bdr::synthesize_component(&sys, c, DEFAULT_ALPHA_STEP) {
                Ok(found) => {
                    assert!(found.alpha >= last);
                    last = found.alpha;
                }
                // once infeasible, larger costs stay infeasible
                Err(_) => last = f64::INFINITY,
            }
        }
    }
}

#[test]
fn overutilized_component_has_no_interface() {
    let sys = single_component(EDF, 10.0, &[(6.0, 10.0), (5.0, 10.0)]);
    let c = sys.component_by_name("C").unwrap();
    let result = bdr::synthesize_component(&sys, c, DEFAULT_ALPHA_STEP);
    assert!(matches!(
        result,
        Err(SynthesisError::Infeasible(InfeasibleInterface { utilization })) if utilization > 1.0
    ));
}

#[test]
fn empty_component_needs_no_bandwidth() {
    let sys = single_component(EDF, 10.0, &[]);
    let c = sys.component_by_name("C").unwrap();
    assert_eq!(
        bdr::synthesize_component(&sys, c, DEFAULT_ALPHA_STEP),
        Ok(Bdr {
            alpha: 0.0,
            delay: 10.0
        })
    );
}

#[test]
fn half_half_transform() {
    let found = Bdr {
        alpha: 0.4,
        delay: 3.0,
    };
    let server = found.to_server(10.0);
    assert_approx_eq!(server.budget, 4.0);
    assert_eq!(server.period, 10.0);
    assert_eq!(server.deadline, 3.0);
    assert_approx_eq!(server.utilization(), 0.4);
    assert_eq!(Server::half_half(&found, 10.0), server);

    let sys = build(&two_component_example());
    let configured = Server::configured(sys.component(sys.component_by_name("C1").unwrap()));
    assert_eq!(
        configured,
        Server {
            budget: 4.0,
            period: 10.0,
            deadline: 6.0
        }
    );
}

#[test]
fn coarser_step_never_finds_less_bandwidth() {
    let sys = build(&two_component_example());
    for c in sys.component_ids() {
        let fine = bdr::synthesize_component(&sys, c, 0.001).unwrap();
        let coarse = bdr::synthesize_component(&sys, c, 0.01).unwrap();
        assert!(coarse.alpha + 1e-9 >= fine.alpha);
    }
}
