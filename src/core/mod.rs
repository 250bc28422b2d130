pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use event::SimEvent;
pub use state::{
    PriorityClass, Process, ProcessId, ProcessIdx, ProcessState, RunQueue, SimCtx, Ticks,
};
pub use timeline::{Label, Segment, Timeline, TimelineBuilder};
