//! Route traversal engine with saga-style compensation.
//!
//! This crate moves a shipment through an ordered route of waypoints one hop
//! at a time. Each forward hop is executed through a bounded-retry executor;
//! when a hop exhausts its retry budget the engine either retries in place
//! (at the origin, where there is nothing to roll back) or compensates the
//! most recently completed hop and resumes one waypoint earlier. If the
//! compensation itself cannot be completed, the engine falls back to
//! resetting the shipment to its origin and restarts traversal from scratch.
//!
//! Every state transition is recorded on an append-only audit trail that can
//! be snapshotted while the traversal is still running.

pub mod checkpoint;
pub mod compensation;
pub mod engine;
pub mod error;
pub mod executor;
pub mod retry;
pub mod route;
pub mod services;
pub mod state;

pub use checkpoint::{CheckpointStore, InMemoryCheckpointStore, TraversalCheckpoint};
pub use compensation::{CompensationSlot, HopMove};
pub use engine::{EngineConfig, TraversalEngine};
pub use error::TraversalError;
pub use executor::HopExecutor;
pub use retry::{BackoffPolicy, RetryPolicy};
pub use route::Route;
pub use services::{
    CarrierService, InMemoryCarrierService, InMemoryResetService, InMemoryRoutingService,
    ResetService, RoutingService,
};
pub use state::TraversalState;
