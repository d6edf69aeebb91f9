//! Traversal error types.

use thiserror::Error;

/// Errors that can occur while driving a shipment traversal.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// The route could not be acquired (fatal setup failure).
    #[error("Routing service error: {0}")]
    Routing(String),

    /// The acquired route is too short to traverse.
    #[error("Route must have at least 2 waypoints, got {len}")]
    InvalidRoute { len: usize },

    /// The shipment record could not be created (fatal setup failure).
    #[error("Failed to create shipment: {0}")]
    ShipmentCreation(String),

    /// A single carrier call failed (recovered by the executor's retry).
    #[error("Carrier service error: {0}")]
    Carrier(String),

    /// A forward hop exhausted its bounded retry budget.
    #[error("Hop {from} -> {to} failed after all retry attempts: {reason}")]
    HopExhausted {
        from: String,
        to: String,
        reason: String,
    },

    /// A compensating hop exhausted its bounded retry budget.
    #[error("Compensation {from} -> {to} failed after all retry attempts: {reason}")]
    CompensationExhausted {
        from: String,
        to: String,
        reason: String,
    },

    /// A single reset attempt failed (the engine retries without bound).
    #[error("Reset service error: {0}")]
    Reset(String),

    /// A checkpoint could not be saved or loaded.
    #[error("Checkpoint store error: {0}")]
    Checkpoint(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for traversal results.
pub type Result<T> = std::result::Result<T, TraversalError>;
