use serde::{Deserialize, Serialize};

use crate::core::state::{PriorityClass, Process, ProcessId, Ticks};

/// Caller-supplied description of one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDef {
    pub id: ProcessId,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: PriorityClass,
}

impl ProcessDef {
    pub fn new(id: impl Into<String>, arrival: Ticks, burst: Ticks, priority: PriorityClass) -> Self {
        Self {
            id: ProcessId(id.into()),
            arrival,
            burst,
            priority,
        }
    }

    pub fn instantiate(&self) -> Process {
        Process::new(self.id.clone(), self.arrival, self.burst, self.priority)
    }
}

/// Final state of one process after a policy run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub id: ProcessId,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: PriorityClass,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
}

impl ProcessResult {
    /// Completion time, 0 if the process never completed.
    pub fn completion(&self) -> Ticks {
        self.completion_time.unwrap_or(0)
    }
}

impl From<Process> for ProcessResult {
    fn from(mut process: Process) -> Self {
        process.finalize();
        Self {
            id: process.id,
            arrival: process.arrival,
            burst: process.burst,
            priority: process.priority,
            start_time: process.start_time,
            completion_time: process.completion_time,
            waiting_time: process.waiting_time,
            turnaround_time: process.turnaround_time,
        }
    }
}
