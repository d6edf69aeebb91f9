//! Hop executor: bounded retries around the raw carrier service.

use common::ShipmentId;

use crate::error::TraversalError;
use crate::retry::RetryPolicy;
use crate::services::CarrierService;

/// Wraps a carrier with bounded retry so only exhausted-retry failures
/// reach the traversal engine.
///
/// Forward moves and compensating moves carry independently configured
/// policies; they do not share a retry budget.
pub struct HopExecutor<C: CarrierService> {
    carrier: C,
    move_policy: RetryPolicy,
    compensate_policy: RetryPolicy,
}

impl<C: CarrierService> HopExecutor<C> {
    /// Creates an executor with the default bounded policies
    /// (3 attempts, 2s initial interval, 5s maximum interval).
    pub fn new(carrier: C) -> Self {
        Self::with_policies(carrier, RetryPolicy::default(), RetryPolicy::default())
    }

    /// Creates an executor with explicit move and compensation policies.
    pub fn with_policies(
        carrier: C,
        move_policy: RetryPolicy,
        compensate_policy: RetryPolicy,
    ) -> Self {
        Self {
            carrier,
            move_policy,
            compensate_policy,
        }
    }

    /// Attempts one forward hop, retrying transient failures.
    ///
    /// Returns `HopExhausted` once the retry budget is spent.
    pub async fn execute_move(
        &self,
        shipment_id: ShipmentId,
        from: &str,
        to: &str,
    ) -> Result<(), TraversalError> {
        self.move_policy
            .run(|| self.carrier.move_hop(shipment_id, from, to))
            .await
            .map_err(|err| TraversalError::HopExhausted {
                from: from.to_string(),
                to: to.to_string(),
                reason: err.to_string(),
            })
    }

    /// Attempts one compensating hop, retrying transient failures.
    ///
    /// Returns `CompensationExhausted` once the retry budget is spent.
    pub async fn execute_compensation(
        &self,
        shipment_id: ShipmentId,
        from: &str,
        to: &str,
    ) -> Result<(), TraversalError> {
        self.compensate_policy
            .run(|| self.carrier.compensate_hop(shipment_id, from, to))
            .await
            .map_err(|err| TraversalError::CompensationExhausted {
                from: from.to_string(),
                to: to.to_string(),
                reason: err.to_string(),
            })
    }
}
