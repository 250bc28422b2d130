//! Performance statistics derived from a policy run.
//!
//! Only the per-process results and the timeline are read; the engine is never
//! consulted again.

use average::{Estimate, Mean};
use serde::Serialize;

use crate::{
    core::Ticks,
    sim::{Outcome, ProcessResult},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Throughput {
    pub checkpoint: Ticks,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub algorithm: String,
    pub case: String,
    pub processes: usize,
    pub avg_waiting: f64,
    pub max_waiting: Ticks,
    pub avg_turnaround: f64,
    pub max_turnaround: Ticks,
    pub throughput: Vec<Throughput>,
    /// Total burst over the last completion time, as a percentage.
    pub cpu_efficiency: f64,
    /// Process-to-process switches observed in the timeline.
    pub context_switches: usize,
    /// `processes - 1`, the figure older reports used.
    pub legacy_context_switches: usize,
}

impl Statistics {
    pub fn compute(
        algorithm: &str,
        case: &str,
        results: &[ProcessResult],
        context_switches: usize,
        checkpoints: &[Ticks],
    ) -> Self {
        let throughput = checkpoints
            .iter()
            .map(|&checkpoint| Throughput {
                checkpoint,
                completed: results
                    .iter()
                    .filter(|r| r.completion_time.is_some_and(|t| t <= checkpoint))
                    .count(),
            })
            .collect();

        let total_burst: Ticks = results.iter().map(|r| r.burst).sum();
        let total_time = results.iter().map(ProcessResult::completion).max().unwrap_or(0);
        let cpu_efficiency = if total_time > 0 {
            total_burst as f64 / total_time as f64 * 100.0
        } else {
            0.0
        };

        Self {
            algorithm: algorithm.to_owned(),
            case: case.to_owned(),
            processes: results.len(),
            avg_waiting: avg(results.iter().map(|r| r.waiting_time)),
            max_waiting: results.iter().map(|r| r.waiting_time).max().unwrap_or(0),
            avg_turnaround: avg(results.iter().map(|r| r.turnaround_time)),
            max_turnaround: results.iter().map(|r| r.turnaround_time).max().unwrap_or(0),
            throughput,
            cpu_efficiency,
            context_switches,
            legacy_context_switches: results.len().saturating_sub(1),
        }
    }

    pub fn from_outcome(outcome: &Outcome, case: &str, checkpoints: &[Ticks]) -> Self {
        Self::compute(
            &outcome.policy,
            case,
            &outcome.processes,
            outcome.timeline.context_switches(),
            checkpoints,
        )
    }

    /// Completed count at the latest checkpoint, 0 without checkpoints.
    pub fn final_throughput(&self) -> usize {
        self.throughput.last().map_or(0, |t| t.completed)
    }
}

fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    let mean: Mean = iter.map(|t| t as f64).collect();
    if mean.is_empty() { 0.0 } else { mean.estimate() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PriorityClass, ProcessId};

    fn result(id: &str, arrival: Ticks, burst: Ticks, start: Ticks, end: Ticks) -> ProcessResult {
        ProcessResult {
            id: ProcessId(id.into()),
            arrival,
            burst,
            priority: PriorityClass::Normal,
            start_time: Some(start),
            completion_time: Some(end),
            waiting_time: start - arrival,
            turnaround_time: end - arrival,
        }
    }

    #[test]
    fn averages_maxima_and_efficiency() {
        let results = [result("P1", 0, 5, 0, 5), result("P2", 2, 3, 5, 8)];
        let stats = Statistics::compute("FCFS", "case1", &results, 1, &[5, 7, 50]);

        assert_eq!(stats.avg_waiting, 1.5);
        assert_eq!(stats.max_waiting, 3);
        assert_eq!(stats.avg_turnaround, 5.5);
        assert_eq!(stats.max_turnaround, 6);
        assert_eq!(stats.cpu_efficiency, 100.0);
        assert_eq!(
            stats.throughput.iter().map(|t| t.completed).collect::<Vec<_>>(),
            [1, 1, 2]
        );
        assert_eq!(stats.final_throughput(), 2);
        assert_eq!(stats.legacy_context_switches, 1);
    }

    #[test]
    fn idle_time_lowers_efficiency() {
        let results = [result("P1", 6, 2, 6, 8)];
        let stats = Statistics::compute("FCFS", "c", &results, 0, &[]);
        assert_eq!(stats.cpu_efficiency, 25.0);
        assert_eq!(stats.final_throughput(), 0);
    }

    #[test]
    fn empty_results_are_all_zero() {
        let stats = Statistics::compute("FCFS", "c", &[], 0, &[50]);
        assert_eq!(stats.avg_waiting, 0.0);
        assert_eq!(stats.avg_turnaround, 0.0);
        assert_eq!(stats.max_turnaround, 0);
        assert_eq!(stats.cpu_efficiency, 0.0);
        assert_eq!(stats.final_throughput(), 0);
        assert_eq!(stats.legacy_context_switches, 0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["avg_waiting"], 0.0);
        assert_eq!(json["avg_turnaround"], 0.0);
    }
}
