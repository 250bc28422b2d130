use super::{DispatchMode, Process, Scheduler};

pub struct PriorityScheduler;

impl Scheduler for PriorityScheduler {
    fn name(&self) -> String {
        "Non-Preemptive Priority".into()
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::RunToCompletion
    }

    fn rank(&self, process: &Process) -> u64 {
        process.priority.rank()
    }
}

// A newly arrived higher class takes the CPU immediately
pub struct PreemptivePriorityScheduler;

impl Scheduler for PreemptivePriorityScheduler {
    fn name(&self) -> String {
        "Preemptive Priority".into()
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Preemptive
    }

    fn rank(&self, process: &Process) -> u64 {
        process.priority.rank()
    }
}
