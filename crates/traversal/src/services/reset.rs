//! Reset fallback trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ShipmentId;

use crate::error::TraversalError;

/// Trait for the last-resort reset operation.
///
/// A single call attempts one reset; the engine retries failed calls
/// without bound, so the traversal blocks until a reset eventually
/// succeeds.
#[async_trait]
pub trait ResetService: Send + Sync {
    /// Returns the shipment to its origin waypoint.
    async fn reset_to_origin(&self, shipment_id: ShipmentId) -> Result<(), TraversalError>;
}

#[derive(Debug, Default)]
struct InMemoryResetState {
    fail_next: u32,
    attempts: u32,
    resets: u32,
}

/// In-memory reset service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResetService {
    state: Arc<RwLock<InMemoryResetState>>,
}

impl InMemoryResetService {
    /// Creates a reset service that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next `count` reset attempts to fail.
    pub fn fail_next(&self, count: u32) {
        self.state.write().unwrap().fail_next = count;
    }

    /// Returns the number of reset attempts made.
    pub fn attempt_count(&self) -> u32 {
        self.state.read().unwrap().attempts
    }

    /// Returns the number of completed resets.
    pub fn reset_count(&self) -> u32 {
        self.state.read().unwrap().resets
    }
}

#[async_trait]
impl ResetService for InMemoryResetService {
    async fn reset_to_origin(&self, shipment_id: ShipmentId) -> Result<(), TraversalError> {
        let mut state = self.state.write().unwrap();
        state.attempts += 1;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(TraversalError::Reset(format!(
                "Reset failed for shipment {shipment_id}"
            )));
        }
        state.resets += 1;
        Ok(())
    }
}
