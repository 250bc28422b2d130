//! Single-CPU scheduling simulator.
//!
//! Runs a set of processes (arrival, burst, priority class) through one of six
//! classical policies and reports the exact execution timeline and the final
//! state of every process.

pub mod config;
pub mod core;
pub mod io;
pub mod scheduler;
pub mod sim;
pub mod stats;

pub use config::SimConfig;
pub use crate::core::{Label, PriorityClass, ProcessId, Segment, SimEvent, Ticks, Timeline};
pub use scheduler::Scheduler;
pub use sim::{Outcome, Policy, ProcessDef, ProcessResult, Sim};
pub use stats::Statistics;
