pub mod driver;
pub mod job;
pub mod workload;

pub use driver::{Outcome, Policy, Sim};
pub use job::{ProcessDef, ProcessResult};
