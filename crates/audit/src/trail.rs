//! Append-only trail of audit events.

use std::sync::{Arc, RwLock};

use crate::event::AuditEvent;

/// Append-only, ordered record of all state transitions for one traversal.
///
/// The trail is a cheaply cloneable handle; clones share the same underlying
/// sequence, so a reader can snapshot the trail while the traversal engine is
/// still appending to it. Events are never removed or rewritten, and a
/// concurrent snapshot always observes a prefix of the final sequence.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl AuditTrail {
    /// Creates a new empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a trail from previously recorded events (checkpoint recovery).
    pub fn from_events(events: Vec<AuditEvent>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    /// Appends an event to the trail.
    ///
    /// Timestamps are clamped so the sequence stays monotonically
    /// non-decreasing even if the wall clock steps backwards.
    pub fn append(&self, mut event: AuditEvent) {
        let mut events = self.events.write().unwrap();
        if let Some(last) = events.last()
            && event.timestamp < last.timestamp
        {
            event.timestamp = last.timestamp;
        }
        events.push(event);
    }

    /// Returns the full ordered sequence of events at the time of the call.
    pub fn snapshot(&self) -> Vec<AuditEvent> {
        self.events.read().unwrap().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    /// Returns true if no events have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.events.read().unwrap().is_empty()
    }
}
