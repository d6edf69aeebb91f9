//! Immutable shipment route.

use serde::{Deserialize, Serialize};

use crate::error::TraversalError;

/// An ordered sequence of waypoint names, immutable once acquired.
///
/// Index 0 is the origin, `len - 1` the destination. A route always has at
/// least two waypoints; anything shorter is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    waypoints: Vec<String>,
}

impl Route {
    /// Builds a route from an ordered list of waypoint names.
    pub fn new(waypoints: Vec<String>) -> Result<Self, TraversalError> {
        if waypoints.len() < 2 {
            return Err(TraversalError::InvalidRoute {
                len: waypoints.len(),
            });
        }
        Ok(Self { waypoints })
    }

    /// Returns the waypoint name at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; the engine's state invariant
    /// keeps indices within `0..len`.
    pub fn waypoint(&self, index: usize) -> &str {
        &self.waypoints[index]
    }

    /// Returns the origin waypoint (index 0).
    pub fn origin(&self) -> &str {
        &self.waypoints[0]
    }

    /// Returns the destination waypoint (last index).
    pub fn destination(&self) -> &str {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Returns the index of the destination waypoint.
    pub fn final_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Returns the number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Routes are never empty; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Returns the waypoints in order.
    pub fn waypoints(&self) -> &[String] {
        &self.waypoints
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.waypoints.join(" -> "))
    }
}
