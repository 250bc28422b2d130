#![allow(dead_code)]

use cpu_sched_model::{Label, PriorityClass, ProcessDef, ProcessResult, Segment, Ticks, Timeline};

/// Initialize tracing from `RUST_LOG`. Idempotent across tests.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn def(id: &str, arrival: Ticks, burst: Ticks, priority: PriorityClass) -> ProcessDef {
    ProcessDef::new(id, arrival, burst, priority)
}

pub fn normal(id: &str, arrival: Ticks, burst: Ticks) -> ProcessDef {
    def(id, arrival, burst, PriorityClass::Normal)
}

/// Timeline as `(start, label, end)` triples, `"IDLE"` for idle segments.
pub fn triples(timeline: &Timeline) -> Vec<(Ticks, String, Ticks)> {
    timeline
        .iter()
        .map(|s| (s.start, s.label.to_string(), s.end))
        .collect()
}

pub fn seg(start: Ticks, label: &str, end: Ticks) -> (Ticks, String, Ticks) {
    (start, label.to_owned(), end)
}

pub fn ids(results: &[ProcessResult]) -> Vec<&str> {
    results.iter().map(|r| r.id.0.as_str()).collect()
}

pub fn result<'a>(results: &'a [ProcessResult], id: &str) -> &'a ProcessResult {
    results
        .iter()
        .find(|r| r.id.0 == id)
        .unwrap_or_else(|| panic!("no result for {id}"))
}

/// CPU time the timeline grants to `id`.
pub fn cpu_time(timeline: &Timeline, id: &str) -> Ticks {
    timeline
        .iter()
        .filter(|s| matches!(&s.label, Label::Process(p) if p.0 == id))
        .map(Segment::len)
        .sum()
}
