use rand::prelude::*;

use super::job::ProcessDef;
use crate::core::state::{PriorityClass, Ticks};

/// Seeded random workload: at each of `ticks` time units a process arrives
/// with probability `p_arrival`; it is short with probability `p_short`.
/// Priority classes are drawn uniformly.
pub fn bernoulli_processes(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Vec<ProcessDef> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut defs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };
            let priority = match rng.random_range(0..3) {
                0 => PriorityClass::High,
                1 => PriorityClass::Normal,
                _ => PriorityClass::Low,
            };

            defs.push(ProcessDef::new(
                format!("P{:03}", defs.len() + 1),
                t,
                burst,
                priority,
            ));
        }
    }

    defs
}
