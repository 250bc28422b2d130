use std::num::NonZeroU64;

use crate::{core::Ticks, scheduler::DEFAULT_QUANTUM};

pub const DEFAULT_CHECKPOINTS: [Ticks; 4] = [50, 100, 150, 200];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Round robin time slice.
    pub quantum: NonZeroU64,
    /// Times at which throughput (completed process count) is reported.
    pub checkpoints: Vec<Ticks>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            checkpoints: DEFAULT_CHECKPOINTS.to_vec(),
        }
    }
}
