//! Ordered event timelines.
//!
//! A [`TimelineBuilder`] collects events while a session is live. Calling
//! [`TimelineBuilder::finalize`] computes every `delay_ms` and yields an
//! immutable [`Timeline`], which is what the compiler and persistence
//! layers consume.

use serde::{Deserialize, Serialize};

use crate::event::{CanonicalEvent, ElapsedMs, EventKind};

/// Mutable timeline owned by an active recording session.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    events: Vec<CanonicalEvent>,
}

/// Frozen, delay-annotated timeline.
///
/// Invariants: events are ordered by `elapsed_ms`, the first event's delay
/// equals its elapsed time, and every later delay is the difference to its
/// predecessor. The sum of all delays therefore equals the last elapsed
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CanonicalEvent>", into = "Vec<CanonicalEvent>")]
pub struct Timeline {
    events: Vec<CanonicalEvent>,
}

/// Errors raised when rebuilding a timeline from stored events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("event {index} at {elapsed_ms}ms precedes previous event at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        elapsed_ms: ElapsedMs,
        previous_ms: ElapsedMs,
    },
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Elapsed values never go backwards: a timestamp
    /// older than the last appended event is clamped up to it. Returns the
    /// elapsed value actually stored.
    pub fn push(&mut self, elapsed_ms: ElapsedMs, kind: EventKind) -> ElapsedMs {
        let elapsed_ms = elapsed_ms.max(self.last_elapsed_ms());
        self.events.push(CanonicalEvent::new(elapsed_ms, kind));
        elapsed_ms
    }

    /// Elapsed time of the newest event, or 0 when empty.
    pub fn last_elapsed_ms(&self) -> ElapsedMs {
        self.events.last().map(|e| e.elapsed_ms).unwrap_or(0)
    }

    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Compute delays and freeze the timeline.
    pub fn finalize(self) -> Timeline {
        let mut events = self.events;
        assign_delays(&mut events);
        Timeline { events }
    }
}

impl Timeline {
    /// Rebuild a timeline from stored events, recomputing delays.
    pub fn from_events(mut events: Vec<CanonicalEvent>) -> Result<Self, TimelineError> {
        for (index, pair) in events.windows(2).enumerate() {
            if pair[1].elapsed_ms < pair[0].elapsed_ms {
                return Err(TimelineError::OutOfOrder {
                    index: index + 1,
                    elapsed_ms: pair[1].elapsed_ms,
                    previous_ms: pair[0].elapsed_ms,
                });
            }
        }
        assign_delays(&mut events);
        Ok(Self { events })
    }

    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Elapsed time of the last event.
    pub fn duration_ms(&self) -> u64 {
        self.events.last().map(|e| e.elapsed_ms).unwrap_or(0)
    }

    /// Number of events that are real input rather than control markers.
    pub fn input_event_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !e.kind.is_control_marker())
            .count()
    }

    pub fn into_events(self) -> Vec<CanonicalEvent> {
        self.events
    }
}

impl TryFrom<Vec<CanonicalEvent>> for Timeline {
    type Error = TimelineError;

    fn try_from(events: Vec<CanonicalEvent>) -> Result<Self, Self::Error> {
        Self::from_events(events)
    }
}

impl From<Timeline> for Vec<CanonicalEvent> {
    fn from(timeline: Timeline) -> Self {
        timeline.events
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a CanonicalEvent;
    type IntoIter = std::slice::Iter<'a, CanonicalEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

fn assign_delays(events: &mut [CanonicalEvent]) {
    let mut previous = 0;
    for event in events.iter_mut() {
        event.delay_ms = event.elapsed_ms - previous;
        previous = event.elapsed_ms;
    }
}
