//! HTTP API server for the shipment traversal system.
//!
//! Exposes endpoints to start a traversal, fetch its result, and read its
//! audit trail, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod registry;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use traversal::{
    EngineConfig, InMemoryCarrierService, InMemoryCheckpointStore, InMemoryResetService,
    InMemoryRoutingService,
};

use registry::WorkflowRegistry;
use routes::shipments::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/shipments/start", post(routes::shipments::start))
        .route(
            "/shipments/{workflow_id}/result",
            get(routes::shipments::result),
        )
        .route(
            "/shipments/{workflow_id}/audit-trail",
            get(routes::shipments::audit_trail),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state around the given collaborator services.
pub fn create_state(
    routing: InMemoryRoutingService,
    carrier: InMemoryCarrierService,
    reset: InMemoryResetService,
    engine_config: EngineConfig,
) -> Arc<AppState> {
    Arc::new(AppState {
        routing,
        carrier,
        reset,
        checkpoints: InMemoryCheckpointStore::new(),
        registry: WorkflowRegistry::new(),
        engine_config,
    })
}

/// Creates the default application state with in-memory services and a
/// demo route.
pub fn create_default_state() -> Arc<AppState> {
    create_state(
        InMemoryRoutingService::with_route(&["Mumbai", "Delhi", "Jaipur", "Bangalore"]),
        InMemoryCarrierService::new(),
        InMemoryResetService::new(),
        EngineConfig::default(),
    )
}
