use crate::demand;
use crate::fixed_priority::{self, Task};
use crate::supply::{BoundedDelay, Dedicated};

fn by_index(params: &[(f64, f64)]) -> Vec<Task> {
    params
        .iter()
        .enumerate()
        .map(|(i, (wcet, period))| Task::new(*wcet, *period, i as u32 + 1))
        .collect()
}

#[test]
fn fp_rta_basic() {
    let params = [(1.0, 4.0), (1.0, 5.0), (3.0, 9.0), (3.0, 18.0)];
    let expected = [1.0, 2.0, 7.0, 18.0];

    let rbfs: Vec<demand::Periodic> = params
        .iter()
        .map(|(wcet, period)| demand::Periodic::new(*wcet, *period))
        .collect();

    for (i, expected_bound) in expected.iter().enumerate() {
        let interference = demand::Aggregate::new(rbfs[0..i].to_vec());
        let result = fixed_priority::fully_preemptive::rta(
            &Dedicated::new(),
            &interference,
            &rbfs[i],
            params[i].1,
        );
        assert_eq!(Ok(*expected_bound), result);
    }

    let bounds = fixed_priority::response_times(&by_index(&params));
    assert_eq!(bounds, vec![Some(1.0), Some(2.0), Some(7.0), Some(18.0)]);
}

#[test]
fn fp_rta_deadline_miss() {
    let params = [(1.0, 2.0), (1.0, 3.0), (3.0, 9.0), (3.0, 18.0)];
    let bounds = fixed_priority::response_times(&by_index(&params));
    assert_eq!(bounds, vec![Some(1.0), Some(2.0), None, None]);
}

/// Example 2 in "Fixed Priority Scheduling of Periodic Task Sets
/// with Arbitrary Deadlines", John P. Lehoczky, RTSS 1990.
/// With implicit deadlines, the lower-priority task misses.
#[test]
fn fp_rta_lehoczky90_ex2() {
    let params = [(52.0, 100.0), (52.0, 140.0)];
    assert_eq!(
        fixed_priority::response_times(&by_index(&params)),
        vec![Some(52.0), None]
    );

    // reversed priorities
    let tasks = vec![Task::new(52.0, 100.0, 2), Task::new(52.0, 140.0, 1)];
    assert_eq!(
        fixed_priority::response_times(&tasks),
        vec![None, Some(52.0)]
    );

    // with the deadline relaxed, the bound from the paper is found
    let tasks = vec![
        Task::new(52.0, 100.0, 1),
        Task {
            deadline: 200.0,
            ..Task::new(52.0, 140.0, 2)
        },
    ];
    assert_eq!(
        fixed_priority::response_times(&tasks),
        vec![Some(52.0), Some(156.0)]
    );
}

/// Reference task sets and bounds from SchedCAT
#[test]
fn fp_rta_schedcat() {
    let tasksets = vec![
        vec![
            (5995.0, 43000.0, 5995.0),
            (2497.0, 44000.0, 8492.0),
            (18376.0, 52000.0, 26868.0),
            (7724.0, 55000.0, 34592.0),
        ],
        vec![
            (1274.0, 13000.0, 1274.0),
            (5840.0, 16000.0, 7114.0),
            (1433.0, 15000.0, 8547.0),
            (1579.0, 13000.0, 10126.0),
        ],
        vec![
            (931.0, 224000.0, 931.0),
            (6600.0, 118000.0, 7531.0),
            (10729.0, 117000.0, 18260.0),
            (2202.0, 153000.0, 20462.0),
            (5174.0, 138000.0, 25636.0),
        ],
    ];

    for taskset in tasksets {
        let params: Vec<_> = taskset.iter().map(|(c, p, _)| (*c, *p)).collect();
        let bounds = fixed_priority::response_times(&by_index(&params));
        for ((_, _, expected), bound) in taskset.iter().zip(bounds) {
            assert_eq!(bound, Some(*expected));
        }
    }
}

#[test]
fn fp_rta_equal_priorities_do_not_interfere() {
    let tasks = vec![Task::new(1.0, 4.0, 1), Task::new(1.0, 4.0, 1)];
    assert_eq!(
        fixed_priority::response_times(&tasks),
        vec![Some(1.0), Some(1.0)]
    );
}

#[test]
fn fp_rta_under_bounded_delay() {
    let supply = BoundedDelay::new(0.5, 2.0);
    let tasks = by_index(&[(1.0, 10.0), (1.0, 20.0)]);
    assert_eq!(
        fixed_priority::response_times_under(&supply, &tasks),
        vec![Some(4.0), Some(6.0)]
    );

    // the supply is too slow for the second task to meet its deadline
    let starved = BoundedDelay::new(0.25, 5.0);
    let tasks = by_index(&[(2.0, 20.0), (2.0, 20.0)]);
    assert_eq!(
        fixed_priority::response_times_under(&starved, &tasks),
        vec![Some(13.0), None]
    );
}
