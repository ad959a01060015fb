use crate::model::{ComponentId, TaskId};
use crate::time::{Duration, Instant, Service};

/// One entry of an execution trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceEvent {
    /// A component's budget was reset; `unused` budget was forfeited.
    Replenished {
        component: ComponentId,
        at: Instant,
        unused: Service,
    },
    /// A job of `task` executed on the budget of `component`.
    Executed {
        component: ComponentId,
        task: TaskId,
        start: Instant,
        end: Instant,
    },
    Completed {
        task: TaskId,
        at: Instant,
        response_time: Duration,
    },
    /// A job was still pending when its successor was released.
    Overrun { task: TaskId, at: Instant },
}
