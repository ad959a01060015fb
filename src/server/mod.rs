/*! Core-level schedulability of a set of periodic servers

Each component is represented on its core by a periodic server
`(Q, P, D)`, either as configured or as obtained from a synthesized
interface via the half-half transform. The servers of a core are
schedulable if the processor demand of their budgets never exceeds the
length of the interval:

- **EDF**: `Σ_k ⌊t / P_k⌋ · Q_k ≤ t` at every multiple of every `P_k`
  and `D_k` up to the hyperperiod of the server periods;
- **RM**: with servers ordered by period, the same inequality for every
  prefix of the order, at all critical points up to the period of the
  prefix's last server.
*/

use itertools::Itertools;
use tracing::debug;

use crate::bdr::Server;
use crate::feasibility::{Verdict, Violation};
use crate::model::Policy;
use crate::time::{self, Duration, Service};

/// The hyperperiod of the servers' periods, if representable.
pub fn hyperperiod(servers: &[Server]) -> Option<Duration> {
    time::hyperperiod(servers.iter().map(|s| s.period))
}

/// All multiples of the servers' periods and deadlines up to
/// `horizon`, in increasing order and without duplicates.
pub fn critical_points(servers: &[Server], horizon: Duration) -> Vec<Duration> {
    servers
        .iter()
        .flat_map(|s| [s.period, s.deadline])
        .filter(|step| *step > 0.0)
        .map(|step| {
            (1u64..)
                .map(move |k| k as f64 * step)
                .take_while(move |t| time::approx_le(*t, horizon))
        })
        .kmerge()
        .dedup_by(|a, b| time::approx_eq(*a, *b))
        .collect()
}

/// Total budget of all server periods that complete within `t`.
pub fn demand<'a, I>(servers: I, t: Duration) -> Service
where
    I: IntoIterator<Item = &'a Server>,
{
    servers
        .into_iter()
        .map(|s| time::floor_div(t, s.period) * s.budget)
        .sum()
}

fn check_at<'a, S, P>(servers: S, points: P) -> Verdict
where
    S: IntoIterator<Item = &'a Server> + Clone,
    P: IntoIterator<Item = Duration>,
{
    for t in points {
        let needed = demand(servers.clone(), t);
        if !time::approx_le(needed, t) {
            return Err(Violation {
                at: t,
                demand: needed,
                supply: t,
            });
        }
    }
    Ok(())
}

/// The core-level EDF test.
pub fn edf_schedulable(servers: &[Server], horizon: Duration) -> Verdict {
    check_at(servers, critical_points(servers, horizon))
}

/// The core-level RM test.
pub fn rm_schedulable(servers: &[Server], horizon: Duration) -> Verdict {
    let points = critical_points(servers, horizon);
    let by_period: Vec<&Server> = servers
        .iter()
        .sorted_by(|a, b| a.period.total_cmp(&b.period))
        .collect();
    for (i, server) in by_period.iter().enumerate() {
        let prefix = by_period[..=i].iter().copied();
        let level = points
            .iter()
            .copied()
            .take_while(|t| time::approx_le(*t, server.period));
        check_at(prefix, level)?;
    }
    Ok(())
}

/// Apply the core-level test for the given policy.
pub fn schedulable(policy: Policy, servers: &[Server], horizon: Duration) -> Verdict {
    let verdict = match policy {
        Policy::EarliestDeadlineFirst => edf_schedulable(servers, horizon),
        Policy::RateMonotonic => rm_schedulable(servers, horizon),
    };
    debug!(%policy, servers = servers.len(), horizon, ?verdict, "core-level test");
    verdict
}
