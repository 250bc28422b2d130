use tracing::debug;

use super::{
    event::SimEvent,
    observer::Observer,
    state::{Process, ProcessIdx, SimCtx, Ticks},
    timeline::{Label, Timeline, TimelineBuilder},
};
use crate::scheduler::Scheduler;

/// One policy run over a private process table.
///
/// Every policy shares this loop: admit arrivals, pick the best ranked ready
/// process, run it for a mode-dependent slice, admit what arrived meanwhile,
/// then complete or requeue it. An empty run queue idles the CPU until the
/// next arrival.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    timeline: TimelineBuilder,
    completion_order: Vec<ProcessIdx>,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(scheduler: S, processes: Vec<Process>) -> Self {
        let ctx = SimCtx::new(processes, scheduler.run_queue());
        let mut core = Self {
            ctx,
            scheduler,
            timeline: TimelineBuilder::new(),
            completion_order: Vec::new(),
            observer: Observer::new(),
        };
        core.admit_arrivals();
        core
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn all_completed(&self) -> bool {
        self.ctx.all_completed()
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Makes one scheduling decision; a no-op once every process completed.
    pub fn step(&mut self) -> Vec<SimEvent> {
        if self.ctx.all_completed() {
            return Vec::new();
        }

        let events = match self.ctx.dequeue() {
            Some(idx) => self.run_slice(idx),
            None => self.idle(),
        };

        self.observer.observe(&self.ctx, &self.timeline, &events);
        events
    }

    fn run_slice(&mut self, idx: ProcessIdx) -> Vec<SimEvent> {
        let mut events = Vec::with_capacity(2);
        let start = self.ctx.now;
        let mode = self.scheduler.mode();

        let until_next_arrival = self.ctx.next_arrival().map(|t| t - start);
        let slice = mode.slice(self.ctx.process(idx).remaining, until_next_arrival);

        self.ctx.set_running(idx);
        events.push(SimEvent::Dispatch {
            process: idx,
            at: start,
            slice,
        });

        self.ctx.run_current(slice);
        let label = Label::Process(self.ctx.process(idx).id.clone());
        self.timeline.record(label, start, self.ctx.now);

        // Arrivals during the slice queue ahead of the process leaving the CPU
        self.admit_arrivals();

        let remaining = self.ctx.process(idx).remaining;
        if remaining == 0 {
            self.ctx.mark_completed(idx);
            self.timeline.close();
            self.completion_order.push(idx);
            debug!(
                process = %self.ctx.process(idx).id,
                at = self.ctx.now,
                "completed"
            );
            events.push(SimEvent::Complete {
                process: idx,
                at: self.ctx.now,
            });
        } else {
            debug_assert!(mode.is_preemptive(), "run-to-completion slice left work");
            self.ctx.clear_cpu();
            let key = self.scheduler.rank(self.ctx.process(idx));
            self.ctx.enqueue(idx, key);
            events.push(SimEvent::Requeue {
                process: idx,
                at: self.ctx.now,
                remaining,
            });
        }

        events
    }

    fn idle(&mut self) -> Vec<SimEvent> {
        let from = self.ctx.now;
        let until = self
            .ctx
            .next_arrival()
            .expect("Idle CPU with unfinished processes but no pending arrival");
        debug_assert!(until > from, "Pending arrival at {until} was not admitted");

        self.timeline.record_idle(from, until);
        self.ctx.advance_to(until);
        self.admit_arrivals();

        vec![SimEvent::Idle { from, until }]
    }

    fn admit_arrivals(&mut self) {
        while let Some(idx) = self.ctx.pop_arrived() {
            let key = self.scheduler.rank(self.ctx.process(idx));
            self.ctx.enqueue(idx, key);
        }
    }

    pub fn run(&mut self) {
        while !self.ctx.all_completed() {
            self.step();
        }
    }

    /// Consumes the run, returning the timeline and the processes in the
    /// order the policy reports them: completion order for run-to-completion
    /// policies, input order for preemptive ones.
    pub fn finish(self) -> (Timeline, Vec<Process>) {
        debug_assert!(self.ctx.all_completed(), "finish() before all processes completed");

        let preemptive = self.scheduler.mode().is_preemptive();
        let timeline = self.timeline.build();
        let completion_order = self.completion_order;
        let mut processes = self.ctx.into_processes();

        if !preemptive {
            let mut slots: Vec<Option<Process>> = processes.into_iter().map(Some).collect();
            processes = completion_order
                .into_iter()
                .filter_map(|idx| slots[idx].take())
                .collect();
        }

        (timeline, processes)
    }
}
