//! Carrier service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ShipmentId;

use crate::compensation::HopMove;
use crate::error::TraversalError;

/// Trait for the physical hop operations.
///
/// Forward moves and compensating (reverse) moves are two methods of one
/// capability; the executor applies an independently configured bounded
/// retry policy to each. Implementations must be idempotent from the
/// engine's perspective: re-attempting the same hop after an interrupted
/// call must not double-apply it.
#[async_trait]
pub trait CarrierService: Send + Sync {
    /// Performs one forward hop between adjacent waypoints.
    async fn move_hop(
        &self,
        shipment_id: ShipmentId,
        from: &str,
        to: &str,
    ) -> Result<(), TraversalError>;

    /// Performs one compensating (reverse) hop.
    async fn compensate_hop(
        &self,
        shipment_id: ShipmentId,
        from: &str,
        to: &str,
    ) -> Result<(), TraversalError>;
}

#[derive(Debug, Default)]
struct InMemoryCarrierState {
    /// Remaining scripted failures per (from, to) pair for forward moves.
    move_failures: HashMap<(String, String), u32>,
    /// Remaining scripted failures per (from, to) pair for compensations.
    compensate_failures: HashMap<(String, String), u32>,
    move_attempts: HashMap<(String, String), u32>,
    compensate_attempts: HashMap<(String, String), u32>,
    moves: Vec<HopMove>,
    compensations: Vec<HopMove>,
}

/// In-memory carrier for testing, with scriptable failure injection.
///
/// `fail_moves(from, to, n)` makes the next `n` forward attempts of that
/// hop fail before subsequent attempts succeed; `fail_compensations` does
/// the same for reverse moves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCarrierService {
    state: Arc<RwLock<InMemoryCarrierState>>,
}

impl InMemoryCarrierService {
    /// Creates a carrier where every hop succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next `count` forward attempts of `from -> to` to fail.
    pub fn fail_moves(&self, from: &str, to: &str, count: u32) {
        self.state
            .write()
            .unwrap()
            .move_failures
            .insert((from.to_string(), to.to_string()), count);
    }

    /// Scripts the next `count` compensations of `from -> to` to fail.
    pub fn fail_compensations(&self, from: &str, to: &str, count: u32) {
        self.state
            .write()
            .unwrap()
            .compensate_failures
            .insert((from.to_string(), to.to_string()), count);
    }

    /// Returns how many forward attempts were made for a hop.
    pub fn move_attempts(&self, from: &str, to: &str) -> u32 {
        self.state
            .read()
            .unwrap()
            .move_attempts
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Returns how many compensation attempts were made for a hop.
    pub fn compensate_attempts(&self, from: &str, to: &str) -> u32 {
        self.state
            .read()
            .unwrap()
            .compensate_attempts
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Returns all successfully completed forward moves in order.
    pub fn moves(&self) -> Vec<HopMove> {
        self.state.read().unwrap().moves.clone()
    }

    /// Returns all successfully completed compensations in order.
    pub fn compensations(&self) -> Vec<HopMove> {
        self.state.read().unwrap().compensations.clone()
    }
}

#[async_trait]
impl CarrierService for InMemoryCarrierService {
    async fn move_hop(
        &self,
        _shipment_id: ShipmentId,
        from: &str,
        to: &str,
    ) -> Result<(), TraversalError> {
        let mut state = self.state.write().unwrap();
        let key = (from.to_string(), to.to_string());
        *state.move_attempts.entry(key.clone()).or_insert(0) += 1;

        if let Some(remaining) = state.move_failures.get_mut(&key)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(TraversalError::Carrier(format!(
                "Move failed: {from} -> {to}"
            )));
        }

        state.moves.push(HopMove::new(from, to));
        Ok(())
    }

    async fn compensate_hop(
        &self,
        _shipment_id: ShipmentId,
        from: &str,
        to: &str,
    ) -> Result<(), TraversalError> {
        let mut state = self.state.write().unwrap();
        let key = (from.to_string(), to.to_string());
        *state.compensate_attempts.entry(key.clone()).or_insert(0) += 1;

        if let Some(remaining) = state.compensate_failures.get_mut(&key)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(TraversalError::Carrier(format!(
                "Compensation failed: {from} -> {to}"
            )));
        }

        state.compensations.push(HopMove::new(from, to));
        Ok(())
    }
}
