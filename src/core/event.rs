use crate::core::{ProcessIdx, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Dispatch {
        process: ProcessIdx,
        at: Ticks,
        slice: Ticks,
    },
    // Slice ended with work left; the process went back to the run queue.
    // It may be picked again right away if it still ranks first.
    Requeue {
        process: ProcessIdx,
        at: Ticks,
        remaining: Ticks,
    },
    Complete {
        process: ProcessIdx,
        at: Ticks,
    },
    // No process ready until the next arrival
    Idle {
        from: Ticks,
        until: Ticks,
    },
}
