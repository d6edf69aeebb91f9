//! Single-slot compensation register.

use serde::{Deserialize, Serialize};

/// A single hop between two adjacent waypoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopMove {
    pub from: String,
    pub to: String,
}

impl HopMove {
    /// Creates a hop description.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns the hop travelled in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

impl std::fmt::Display for HopMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Holds at most one pending compensation action at a time.
///
/// Exactly one hop is ever unconfirmed during traversal, so a full
/// multi-step compensation stack is unnecessary: the slot is re-registered
/// before each forward attempt and either consumed (executed) on failure or
/// superseded by the next iteration's registration.
#[derive(Debug, Clone, Default)]
pub struct CompensationSlot {
    pending: Option<HopMove>,
}

impl CompensationSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the reverse hop that undoes arriving at the current
    /// waypoint, replacing any previously registered entry.
    pub fn register(&mut self, reverse_hop: HopMove) {
        self.pending = Some(reverse_hop);
    }

    /// Consumes the pending entry, if any.
    pub fn take(&mut self) -> Option<HopMove> {
        self.pending.take()
    }

    /// Discards the pending entry without executing it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Returns the pending entry without consuming it.
    pub fn pending(&self) -> Option<&HopMove> {
        self.pending.as_ref()
    }
}
