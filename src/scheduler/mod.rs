pub mod fifo;
pub mod priq;
pub mod rr;
pub mod sjf;

use std::num::NonZeroU64;

use crate::core::{
    Ticks,
    state::{Process, RunQueue},
};
pub use fifo::FcfsScheduler;
pub use priq::{PreemptivePriorityScheduler, PriorityScheduler};
pub use rr::RoundRobinScheduler;
pub use sjf::{SjfScheduler, SrtfScheduler};

pub const DEFAULT_QUANTUM: NonZeroU64 = match NonZeroU64::new(4) {
    Some(quantum) => quantum,
    None => panic!("default quantum must be non-zero"),
};

/// How long a dispatched process keeps the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Whole remaining burst, no preemption.
    RunToCompletion,
    /// Selection is re-evaluated every tick; the process may be preempted as
    /// soon as a better ranked one arrives.
    Preemptive,
    /// At most one quantum, then back to the tail of the run queue.
    TimeSlice(NonZeroU64),
}

impl DispatchMode {
    /// Length of the next slice for a process with `remaining` work, given the
    /// time until the next not-yet-admitted arrival.
    ///
    /// For `Preemptive` the ranking of the running process can only change
    /// when another process arrives, so running until then is equivalent to
    /// re-selecting at every tick.
    pub fn slice(self, remaining: Ticks, until_next_arrival: Option<Ticks>) -> Ticks {
        match self {
            Self::RunToCompletion => remaining,
            Self::Preemptive => until_next_arrival.map_or(remaining, |gap| remaining.min(gap)),
            Self::TimeSlice(quantum) => remaining.min(quantum.get()),
        }
    }

    pub fn is_preemptive(self) -> bool {
        !matches!(self, Self::RunToCompletion)
    }
}

/// A selection policy: which processes rank first, and how long they run.
///
/// Lower rank wins; ties go to the process that came first in the input.
pub trait Scheduler {
    fn name(&self) -> String;

    fn mode(&self) -> DispatchMode;

    fn run_queue(&self) -> RunQueue {
        RunQueue::new_priq()
    }

    fn rank(&self, process: &Process) -> u64;
}
