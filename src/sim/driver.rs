use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::job::{ProcessDef, ProcessResult};
use crate::{
    config::SimConfig,
    core::{SimEvent, Ticks, driver::SchedCore, timeline::Timeline},
    scheduler::{
        FcfsScheduler, PreemptivePriorityScheduler, PriorityScheduler, RoundRobinScheduler,
        Scheduler, SjfScheduler, SrtfScheduler,
    },
};

/// Result of running one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub policy: String,
    pub timeline: Timeline,
    pub processes: Vec<ProcessResult>,
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    /// Copies `defs` into a private process table; the caller's list is never
    /// touched, so independent runs cannot interfere.
    pub fn new(scheduler: S, defs: &[ProcessDef]) -> Self {
        let processes = defs.iter().map(ProcessDef::instantiate).collect();
        Self {
            core: SchedCore::new(scheduler, processes),
        }
    }

    pub fn step(&mut self) -> Vec<SimEvent> {
        self.core.step()
    }

    pub fn now(&self) -> Ticks {
        self.core.now()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.all_completed()
    }

    pub fn run(scheduler: S, defs: &[ProcessDef]) -> Outcome {
        let mut sim = Self::new(scheduler, defs);
        let policy = sim.core.scheduler.name();
        debug!(%policy, processes = defs.len(), "starting run");

        sim.core.run();

        let observer = sim.core.observer();
        info!(
            %policy,
            end = sim.now(),
            steps = observer.step(),
            dispatches = observer.dispatches(),
            "run finished"
        );

        let (timeline, processes) = sim.core.finish();
        Outcome {
            policy,
            timeline,
            processes: processes.into_iter().map(ProcessResult::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Policy {
    Fcfs,
    Sjf,
    Srtf,
    #[value(name = "rr")]
    RoundRobin,
    Priority,
    PriorityPreemptive,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Self::Fcfs,
        Self::Sjf,
        Self::Srtf,
        Self::RoundRobin,
        Self::Priority,
        Self::PriorityPreemptive,
    ];

    /// Stem used for output file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF_NonPreemptive",
            Self::Srtf => "SJF_Preemptive",
            Self::RoundRobin => "RoundRobin",
            Self::Priority => "Priority_NonPreemptive",
            Self::PriorityPreemptive => "Priority_Preemptive",
        }
    }

    pub fn run(self, defs: &[ProcessDef], config: &SimConfig) -> Outcome {
        match self {
            Self::Fcfs => Sim::run(FcfsScheduler, defs),
            Self::Sjf => Sim::run(SjfScheduler, defs),
            Self::Srtf => Sim::run(SrtfScheduler, defs),
            Self::RoundRobin => Sim::run(RoundRobinScheduler::new(config.quantum), defs),
            Self::Priority => Sim::run(PriorityScheduler, defs),
            Self::PriorityPreemptive => Sim::run(PreemptivePriorityScheduler, defs),
        }
    }
}

// Same names the command line accepts
impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PriorityClass;

    #[test]
    fn step_reports_idle_then_dispatch() {
        let defs = [ProcessDef::new("P1", 3, 2, PriorityClass::Normal)];
        let mut sim = Sim::new(FcfsScheduler, &defs);

        assert_eq!(sim.step(), vec![SimEvent::Idle { from: 0, until: 3 }]);
        assert_eq!(
            sim.step(),
            vec![
                SimEvent::Dispatch { process: 0, at: 3, slice: 2 },
                SimEvent::Complete { process: 0, at: 5 },
            ]
        );
        assert!(sim.all_processes_completed());
        assert!(sim.step().is_empty());
    }

    #[test]
    fn policy_names_parse_back() {
        let names: Vec<String> = Policy::ALL.iter().map(Policy::to_string).collect();
        assert_eq!(
            names,
            ["fcfs", "sjf", "srtf", "rr", "priority", "priority-preemptive"]
        );
        for policy in Policy::ALL {
            assert_eq!(Policy::from_str(&policy.to_string(), false), Ok(policy));
        }
        assert_eq!(Policy::value_variants(), &Policy::ALL[..]);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        for policy in Policy::ALL {
            let outcome = policy.run(&[], &SimConfig::default());
            assert!(outcome.timeline.is_empty());
            assert!(outcome.processes.is_empty());
        }
    }
}
