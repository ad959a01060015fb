/*! Simulation and schedulability analysis of two-level hierarchical
real-time systems.

Tasks execute inside *components*, i.e., periodic servers with a budget
`Q` replenished every `P` time units; components execute on *cores*
under a core-level policy. Both levels are scheduled by either
rate-monotonic (RM) or earliest-deadline-first (EDF) scheduling.

The crate answers whether every task meets its deadline in two
complementary ways:

- [simulator]: a discrete-event simulation of the exact two-level
  schedule of one core, yielding observed response times;
- analytic tests: fixed-priority response-time analysis
  ([fixed_priority]), demand/supply feasibility of a component under its
  periodic resource ([feasibility]), synthesis of a minimal
  bounded-delay resource interface per component ([bdr]), and the
  core-level test of a set of servers ([server]).

The [analysis] module ties everything together and produces one report
record per task.
*/

pub mod analysis;
pub mod bdr;
pub mod config;
pub mod demand;
pub mod feasibility;
pub mod fixed_point;
pub mod fixed_priority;
pub mod model;
pub mod server;
pub mod simulator;
pub mod supply;
pub mod time;

pub use analysis::{analyze, Error, SystemReport, TaskReport};
pub use config::AnalysisConfig;
pub use model::{ConfigurationError, Policy, System, SystemRecords};
