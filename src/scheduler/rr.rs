use std::num::NonZeroU64;

use super::{DEFAULT_QUANTUM, DispatchMode, Process, RunQueue, Scheduler};

/// Round robin over a FIFO run queue.
///
/// When a slice expires, processes that arrived during it are queued ahead of
/// the process that just gave up the CPU.
pub struct RoundRobinScheduler {
    quantum: NonZeroU64,
}

impl RoundRobinScheduler {
    pub fn new(quantum: NonZeroU64) -> Self {
        Self { quantum }
    }
}

impl Default for RoundRobinScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUANTUM)
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> String {
        format!("Round Robin (Q={})", self.quantum)
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::TimeSlice(self.quantum)
    }

    fn run_queue(&self) -> RunQueue {
        RunQueue::new_fifo()
    }

    // Queue position is the only ordering
    fn rank(&self, _process: &Process) -> u64 {
        0
    }
}
