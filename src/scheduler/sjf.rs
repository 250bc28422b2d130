use super::{DispatchMode, Process, Scheduler};

/// Shortest job first; the shortest burst among ready processes runs to
/// completion.
pub struct SjfScheduler;

impl Scheduler for SjfScheduler {
    fn name(&self) -> String {
        "Non-Preemptive SJF".into()
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::RunToCompletion
    }

    fn rank(&self, process: &Process) -> u64 {
        process.burst
    }
}

/// Shortest remaining time first.
pub struct SrtfScheduler;

impl Scheduler for SrtfScheduler {
    fn name(&self) -> String {
        "Preemptive SJF".into()
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Preemptive
    }

    fn rank(&self, process: &Process) -> u64 {
        process.remaining
    }
}
