use tracing::trace;

use super::{
    event::SimEvent,
    state::{ProcessState, SimCtx},
    timeline::TimelineBuilder,
};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    dispatches: u64,
    requeues: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }

    pub fn requeues(&self) -> u64 {
        self.requeues
    }

    pub fn observe(&mut self, ctx: &SimCtx, timeline: &TimelineBuilder, events: &[SimEvent]) {
        self.step += 1;

        for event in events {
            trace!(step = self.step, ?event);
            match event {
                SimEvent::Dispatch { .. } => self.dispatches += 1,
                SimEvent::Requeue { .. } => self.requeues += 1,
                _ => {}
            }
        }

        debug_assert_eq!(
            timeline.cursor(),
            ctx.now,
            "timeline must cover exactly [0, now)"
        );

        let mut running = 0;
        for process in &ctx.processes {
            debug_assert!(
                process.remaining <= process.burst,
                "Process {} remaining exceeds burst",
                process.id
            );
            match process.state {
                ProcessState::Running => running += 1,
                ProcessState::Completed => debug_assert!(
                    process.remaining == 0 && process.completion_time.is_some(),
                    "Completed process {} has work left",
                    process.id
                ),
                ProcessState::Ready => debug_assert!(
                    process.arrival <= ctx.now,
                    "Process {} ready before its arrival",
                    process.id
                ),
                ProcessState::Pending => {}
            }
        }
        debug_assert_eq!(
            running,
            usize::from(ctx.current.is_some()),
            "single CPU runs at most the current process"
        );
    }
}
