//! Traversal position and retry-cycle tracking.

use common::ShipmentId;
use serde::{Deserialize, Serialize};

/// Mutable position of one traversal, owned exclusively by the engine.
///
/// `current_index` always stays within `0..=final_index` of the route being
/// traversed: it only moves by the transition methods below, which never take
/// it below zero (backtracking is only reachable when a prior hop completed,
/// so the index is positive). `retry_cycle` is cycle-scoped — it resets only
/// on a successful forward advance, never on a successful compensation, so
/// repeated backtracking produces monotonically growing backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalState {
    shipment_id: ShipmentId,
    current_index: usize,
    retry_cycle: u32,
}

impl TraversalState {
    /// Creates the state for a fresh traversal positioned at the origin.
    pub fn new(shipment_id: ShipmentId) -> Self {
        Self {
            shipment_id,
            current_index: 0,
            retry_cycle: 0,
        }
    }

    /// Returns the shipment identifier.
    pub fn shipment_id(&self) -> ShipmentId {
        self.shipment_id
    }

    /// Returns the current waypoint index.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the current retry cycle.
    pub fn retry_cycle(&self) -> u32 {
        self.retry_cycle
    }

    /// Returns true if the traversal is positioned at the origin.
    pub fn at_origin(&self) -> bool {
        self.current_index == 0
    }

    /// Records a successful forward hop: advance one waypoint and reset
    /// the retry cycle.
    pub fn advance(&mut self) {
        self.current_index += 1;
        self.retry_cycle = 0;
    }

    /// Records a failed hop at the origin: stay in place, grow the cycle.
    pub fn retry_in_place(&mut self) {
        self.retry_cycle += 1;
    }

    /// Records a successful compensation: step back one waypoint and grow
    /// the cycle. Only reachable mid-route.
    pub fn backtrack(&mut self) {
        debug_assert!(self.current_index > 0, "cannot backtrack past the origin");
        self.current_index -= 1;
        self.retry_cycle += 1;
    }

    /// Records a completed reset fallback: back to the origin. The retry
    /// cycle is left as-is; it resets on the next successful forward hop.
    pub fn reset_to_origin(&mut self) {
        self.current_index = 0;
    }
}
