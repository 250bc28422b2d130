use super::{DispatchMode, Process, Scheduler};

/// First come, first served: earliest arrival runs to completion.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    fn name(&self) -> String {
        "FCFS".into()
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::RunToCompletion
    }

    fn rank(&self, process: &Process) -> u64 {
        process.arrival
    }
}
