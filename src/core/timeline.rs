use serde::Serialize;
use std::fmt;

use super::state::{ProcessId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Idle,
    Process(ProcessId),
}

impl Label {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::Process(id) => id.fmt(f),
        }
    }
}

/// A maximal interval `[start, end)` during which one process (or nothing)
/// occupies the CPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: Ticks,
    pub label: Label,
    pub end: Ticks,
}

impl Segment {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] - {} - [{}]", self.start, self.label, self.end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End of the last segment, 0 for an empty timeline.
    pub fn end(&self) -> Ticks {
        self.segments.last().map_or(0, |s| s.end)
    }

    pub fn busy_time(&self) -> Ticks {
        self.iter()
            .filter(|s| !s.label.is_idle())
            .map(Segment::len)
            .sum()
    }

    /// Number of times the CPU moved from one process to a different one.
    /// Idle gaps in between do not count as a switch on their own.
    pub fn context_switches(&self) -> usize {
        let mut last: Option<&ProcessId> = None;
        let mut switches = 0;
        for segment in &self.segments {
            if let Label::Process(id) = &segment.label {
                if last.is_some_and(|prev| prev != id) {
                    switches += 1;
                }
                last = Some(id);
            }
        }
        switches
    }

    /// True if the segments cover `[0, end())` without gaps or overlaps.
    pub fn is_partition(&self) -> bool {
        let mut cursor = 0;
        for segment in &self.segments {
            if segment.start != cursor || segment.start >= segment.end {
                return false;
            }
            cursor = segment.end;
        }
        true
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            writeln!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Accumulates segments, coalescing back-to-back runs of the same label into
/// a single open segment until it is closed.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    segments: Vec<Segment>,
    open: Option<Segment>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time at which the next recorded interval must start.
    pub fn cursor(&self) -> Ticks {
        self.open
            .as_ref()
            .or(self.segments.last())
            .map_or(0, |s| s.end)
    }

    pub fn record(&mut self, label: Label, start: Ticks, end: Ticks) {
        debug_assert!(start < end, "empty segment [{start}, {end})");
        debug_assert_eq!(start, self.cursor(), "timeline gap or overlap at {start}");

        if let Some(open) = self.open.as_mut() {
            if open.label == label && open.end == start {
                open.end = end;
                return;
            }
        }

        self.close();
        self.open = Some(Segment { start, label, end });
    }

    pub fn record_idle(&mut self, start: Ticks, end: Ticks) {
        self.record(Label::Idle, start, end);
    }

    /// Ends the in-progress segment; the next record starts a new one.
    pub fn close(&mut self) {
        if let Some(segment) = self.open.take() {
            self.segments.push(segment);
        }
    }

    pub fn build(mut self) -> Timeline {
        self.close();
        Timeline {
            segments: self.segments,
        }
    }
}
