//! Routing service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ShipmentId;

use crate::error::TraversalError;
use crate::route::Route;

/// Trait for route acquisition and shipment record creation.
///
/// Transport errors from either operation are fatal to the whole traversal;
/// the engine performs no retries of its own here.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Fetches the ordered route for a shipment handle.
    async fn fetch_route(&self, handle: &str) -> Result<Route, TraversalError>;

    /// Creates a shipment record and returns its identifier.
    async fn create_shipment(&self, handle: &str) -> Result<ShipmentId, TraversalError>;
}

#[derive(Debug, Default)]
struct InMemoryRoutingState {
    waypoints: Vec<String>,
    shipments: HashMap<i64, String>,
    next_id: i64,
    fail_on_fetch: bool,
    fail_on_create: bool,
}

/// In-memory routing service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoutingService {
    state: Arc<RwLock<InMemoryRoutingState>>,
}

impl InMemoryRoutingService {
    /// Creates a routing service that serves the given route to every handle.
    pub fn with_route(waypoints: &[&str]) -> Self {
        let service = Self::default();
        service.state.write().unwrap().waypoints =
            waypoints.iter().map(|s| s.to_string()).collect();
        service
    }

    /// Configures fetch_route to fail.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Configures create_shipment to fail.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of shipment records created.
    pub fn shipment_count(&self) -> usize {
        self.state.read().unwrap().shipments.len()
    }
}

#[async_trait]
impl RoutingService for InMemoryRoutingService {
    async fn fetch_route(&self, _handle: &str) -> Result<Route, TraversalError> {
        let state = self.state.read().unwrap();
        if state.fail_on_fetch {
            return Err(TraversalError::Routing(
                "Route service unavailable".to_string(),
            ));
        }
        Route::new(state.waypoints.clone())
    }

    async fn create_shipment(&self, handle: &str) -> Result<ShipmentId, TraversalError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_create {
            return Err(TraversalError::ShipmentCreation(
                "Shipment service unavailable".to_string(),
            ));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.shipments.insert(id, handle.to_string());
        Ok(ShipmentId::new(id))
    }
}
