use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// Index into the process Vec; doubles as the stable tie-break key
pub type ProcessIdx = usize;
pub type Ticks = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub String);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    High,
    #[default]
    Normal,
    Low,
}

impl PriorityClass {
    /// Ordinal used for comparison; lower runs first.
    pub fn rank(self) -> u64 {
        match self {
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

// Unrecognized classes fall back to normal
impl From<&str> for PriorityClass {
    fn from(class: &str) -> Self {
        match class.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: ProcessId,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: PriorityClass,
    pub state: ProcessState,
    pub remaining: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
}

impl Process {
    pub fn new(id: ProcessId, arrival: Ticks, burst: Ticks, priority: PriorityClass) -> Self {
        Self {
            id,
            arrival,
            burst,
            priority,
            state: ProcessState::Pending,
            remaining: burst,
            start_time: None,
            completion_time: None,
            waiting_time: 0,
            turnaround_time: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// Derives waiting and turnaround time once the process has completed.
    ///
    /// Waiting time is measured from arrival to first dispatch and saturates
    /// at zero. Calling this before completion leaves both values untouched.
    pub fn finalize(&mut self) -> &mut Self {
        if let Some(completion) = self.completion_time.filter(|&t| t > 0) {
            self.turnaround_time = completion.saturating_sub(self.arrival);
            self.waiting_time = self
                .start_time
                .map_or(0, |start| start.saturating_sub(self.arrival));
        }
        self
    }
}

// KeyedPriorityQueue is a max-heap, so flip the ordering to pop the lowest
// (key, index) pair first
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rank {
    pub key: u64,
    pub idx: ProcessIdx,
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (other.key, other.idx).cmp(&(self.key, self.idx))
    }
}

#[derive(Debug)]
pub enum RunQueue {
    Fifo {
        tasks: VecDeque<ProcessIdx>,
        members: FxHashSet<ProcessIdx>,
    },
    Priq {
        tasks: KeyedPriorityQueue<ProcessIdx, Rank>,
    },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
            members: FxHashSet::default(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, idx: ProcessIdx) -> bool {
        match self {
            Self::Fifo { members, .. } => members.contains(&idx),
            Self::Priq { tasks } => tasks.get_priority(&idx).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks, .. } => tasks.len(),
            Self::Priq { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns false if the process was already queued.
    pub fn push(&mut self, idx: ProcessIdx, key: u64) -> bool {
        match self {
            Self::Fifo { tasks, members } => {
                if !members.insert(idx) {
                    return false;
                }
                tasks.push_back(idx);
                true
            }
            Self::Priq { tasks } => {
                if tasks.get_priority(&idx).is_some() {
                    return false;
                }
                tasks.push(idx, Rank { key, idx });
                true
            }
        }
    }

    pub fn pop(&mut self) -> Option<ProcessIdx> {
        match self {
            Self::Fifo { tasks, members } => {
                let idx = tasks.pop_front()?;
                members.remove(&idx);
                Some(idx)
            }
            Self::Priq { tasks } => tasks.pop().map(|(idx, _)| idx),
        }
    }
}

/// Working state of one simulation run over a private copy of the processes.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub run_queue: RunQueue,
    pub current: Option<ProcessIdx>,

    // Process indices ordered by (arrival, index); everything before the
    // cursor has been admitted
    arrivals: Vec<ProcessIdx>,
    arrival_cursor: usize,
    completed: usize,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>, run_queue: RunQueue) -> Self {
        let mut arrivals: Vec<ProcessIdx> = (0..processes.len()).collect();
        arrivals.sort_by_key(|&idx| (processes[idx].arrival, idx));

        Self {
            now: 0,
            processes,
            run_queue,
            current: None,
            arrivals,
            arrival_cursor: 0,
            completed: 0,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn advance_to(&mut self, time: Ticks) {
        debug_assert!(time >= self.now, "time must not go backwards");
        self.now = time;
    }

    pub fn process(&self, idx: ProcessIdx) -> &Process {
        &self.processes[idx]
    }

    pub fn process_mut(&mut self, idx: ProcessIdx) -> &mut Process {
        &mut self.processes[idx]
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.processes.len()
    }

    /// Arrival time of the earliest process not yet admitted.
    pub fn next_arrival(&self) -> Option<Ticks> {
        self.arrivals
            .get(self.arrival_cursor)
            .map(|&idx| self.processes[idx].arrival)
    }

    /// Takes the next process whose arrival is at or before `now`.
    /// Contiguous, since arrivals are sorted.
    pub fn pop_arrived(&mut self) -> Option<ProcessIdx> {
        let &idx = self.arrivals.get(self.arrival_cursor)?;
        if self.processes[idx].arrival > self.now {
            return None;
        }
        self.arrival_cursor += 1;
        Some(idx)
    }

    pub fn enqueue(&mut self, idx: ProcessIdx, key: u64) {
        let process = self.process_mut(idx);
        debug_assert!(
            process.state == ProcessState::Pending || process.state == ProcessState::Running,
            "Process {} must be Pending or Running when enqueued",
            process.id
        );
        process.state = ProcessState::Ready;

        let pushed = self.run_queue.push(idx, key);
        debug_assert!(pushed, "Process {idx} already present in run queue");
    }

    pub fn dequeue(&mut self) -> Option<ProcessIdx> {
        self.run_queue.pop()
    }

    pub fn set_running(&mut self, idx: ProcessIdx) {
        debug_assert!(
            !self.run_queue.contains(idx),
            "Running process {idx} must not be enqueued"
        );
        debug_assert!(self.current.is_none(), "CPU already running a process");

        let now = self.now;
        self.current = Some(idx);
        let process = self.process_mut(idx);
        debug_assert_eq!(process.state, ProcessState::Ready);
        process.state = ProcessState::Running;
        process.start_time.get_or_insert(now);
    }

    /// Charges `ticks` of CPU time to the running process and advances the clock.
    pub fn run_current(&mut self, ticks: Ticks) -> ProcessIdx {
        let idx = self.current.expect("run_current() with an idle CPU");
        let process = self.process_mut(idx);
        assert!(
            ticks > 0 && ticks <= process.remaining,
            "Process {} cannot run {ticks} ticks with {} remaining",
            process.id,
            process.remaining
        );
        process.remaining -= ticks;
        self.advance_time(ticks);
        idx
    }

    pub fn mark_completed(&mut self, idx: ProcessIdx) {
        debug_assert_eq!(self.current, Some(idx), "Only the running process can complete");

        let now = self.now;
        let process = &mut self.processes[idx];
        debug_assert_eq!(process.remaining, 0, "Process {} completed early", process.id);
        debug_assert!(
            process.completion_time.is_none(),
            "Process {} completed twice",
            process.id
        );

        process.state = ProcessState::Completed;
        process.completion_time = Some(now);
        self.current = None;
        self.completed += 1;
    }

    pub fn clear_cpu(&mut self) -> Option<ProcessIdx> {
        self.current.take()
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(id: &str, arrival: Ticks, burst: Ticks) -> Process {
        Process::new(id.into(), arrival, burst, PriorityClass::Normal)
    }

    #[test]
    fn priority_class_parsing_defaults_to_normal() {
        assert_eq!(PriorityClass::from("HIGH"), PriorityClass::High);
        assert_eq!(PriorityClass::from(" low "), PriorityClass::Low);
        assert_eq!(PriorityClass::from("urgent"), PriorityClass::Normal);
        assert!(PriorityClass::High.rank() < PriorityClass::Low.rank());
    }

    #[test]
    fn finalize_clamps_waiting_time() {
        let mut p = proc("P1", 5, 3);
        p.finalize();
        assert_eq!((p.waiting_time, p.turnaround_time), (0, 0));

        p.start_time = Some(7);
        p.completion_time = Some(10);
        p.finalize();
        assert_eq!(p.waiting_time, 2);
        assert_eq!(p.turnaround_time, 5);

        p.start_time = Some(3);
        p.finalize();
        assert_eq!(p.waiting_time, 0);
    }

    #[test]
    fn priq_pops_lowest_key_then_lowest_index() {
        let mut rq = RunQueue::new_priq();
        assert!(rq.push(2, 5));
        assert!(rq.push(1, 5));
        assert!(rq.push(0, 7));
        assert!(!rq.push(1, 1));
        assert_eq!(rq.pop(), Some(1));
        assert_eq!(rq.pop(), Some(2));
        assert_eq!(rq.pop(), Some(0));
        assert!(rq.is_empty());
    }

    #[test]
    fn fifo_rejects_duplicates_and_keeps_order() {
        let mut rq = RunQueue::new_fifo();
        assert!(rq.push(3, 0));
        assert!(rq.push(1, 0));
        assert!(!rq.push(3, 0));
        assert!(rq.contains(3));
        assert_eq!(rq.pop(), Some(3));
        assert!(!rq.contains(3));
        assert!(rq.push(3, 0));
        assert_eq!(rq.pop(), Some(1));
        assert_eq!(rq.pop(), Some(3));
        assert_eq!(rq.pop(), None);
    }

    #[test]
    fn arrivals_are_admitted_in_order() {
        let mut ctx = SimCtx::new(
            vec![proc("A", 4, 1), proc("B", 0, 1), proc("C", 4, 1)],
            RunQueue::new_fifo(),
        );
        assert_eq!(ctx.pop_arrived(), Some(1));
        assert_eq!(ctx.pop_arrived(), None);
        assert_eq!(ctx.next_arrival(), Some(4));

        ctx.advance_to(4);
        assert_eq!(ctx.pop_arrived(), Some(0));
        assert_eq!(ctx.pop_arrived(), Some(2));
        assert_eq!(ctx.next_arrival(), None);
    }
}
