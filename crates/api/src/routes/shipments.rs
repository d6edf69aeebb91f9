//! Shipment traversal endpoints.

use std::sync::Arc;

use audit::AuditEvent;
use axum::Json;
use axum::extract::{Path, State};
use common::WorkflowId;
use serde::{Deserialize, Serialize};
use traversal::{
    EngineConfig, InMemoryCarrierService, InMemoryCheckpointStore, InMemoryResetService,
    InMemoryRoutingService, TraversalEngine,
};

use crate::error::ApiError;
use crate::registry::{WorkflowRegistry, WorkflowStatus};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub routing: InMemoryRoutingService,
    pub carrier: InMemoryCarrierService,
    pub reset: InMemoryResetService,
    pub checkpoints: InMemoryCheckpointStore,
    pub registry: WorkflowRegistry,
    pub engine_config: EngineConfig,
}

// -- Request types --

#[derive(Deserialize)]
pub struct StartShipmentRequest {
    pub shipment_handle: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct ShipmentResponse {
    pub success: bool,
    pub message: String,
    pub workflow_id: Option<String>,
}

#[derive(Serialize)]
pub struct AuditTrailResponse {
    pub success: bool,
    pub message: String,
    pub workflow_id: String,
    pub audit_trail: Vec<AuditEvent>,
}

// -- Handlers --

/// POST /shipments/start — begin traversal for a shipment handle.
///
/// The workflow ID is derived from the handle, so re-submitting the same
/// handle while a run is active (or after it completed) is rejected with
/// 409; only a failed run may be started again.
#[tracing::instrument(skip(state, req))]
pub async fn start(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartShipmentRequest>,
) -> Result<Json<ShipmentResponse>, ApiError> {
    if req.shipment_handle.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Shipment handle is required".to_string(),
        ));
    }

    let workflow_id = WorkflowId::for_handle(&req.shipment_handle);
    let engine = TraversalEngine::with_config(
        state.routing.clone(),
        state.carrier.clone(),
        state.reset.clone(),
        state.checkpoints.clone(),
        state.engine_config.clone(),
    );
    let trail = engine.audit_trail();

    if !state
        .registry
        .try_register(workflow_id.clone(), &req.shipment_handle, trail)
        .await
    {
        return Err(ApiError::Conflict(format!(
            "Workflow {workflow_id} is already running or completed"
        )));
    }

    tracing::info!(%workflow_id, "workflow started");
    let registry = state.registry.clone();
    let id = workflow_id.clone();
    let shipment_handle = req.shipment_handle.clone();
    tokio::spawn(async move {
        match engine.execute(&shipment_handle).await {
            Ok(message) => registry.mark_completed(&id, message).await,
            Err(err) => {
                tracing::error!(workflow_id = %id, error = %err, "workflow failed");
                registry.mark_failed(&id, err.to_string()).await;
            }
        }
    });

    Ok(Json(ShipmentResponse {
        success: true,
        message: "Shipment workflow started successfully".to_string(),
        workflow_id: Some(workflow_id.to_string()),
    }))
}

/// GET /shipments/:workflow_id/result — the completion message, once the
/// traversal has finished.
#[tracing::instrument(skip(state))]
pub async fn result(
    State(state): State<Arc<AppState>>,
    Path(workflow_id): Path<String>,
) -> Result<Json<ShipmentResponse>, ApiError> {
    let id = WorkflowId::from_string(workflow_id);

    let status = state
        .registry
        .status(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Workflow {id} not found")))?;

    let response = match status {
        WorkflowStatus::Running => ShipmentResponse {
            success: false,
            message: "Shipment workflow is still running".to_string(),
            workflow_id: Some(id.to_string()),
        },
        WorkflowStatus::Completed(message) => ShipmentResponse {
            success: true,
            message,
            workflow_id: Some(id.to_string()),
        },
        WorkflowStatus::Failed(error) => ShipmentResponse {
            success: false,
            message: format!("Shipment workflow failed: {error}"),
            workflow_id: Some(id.to_string()),
        },
    };

    Ok(Json(response))
}

/// GET /shipments/:workflow_id/audit-trail — ordered audit events, safe to
/// call while the traversal is still running.
#[tracing::instrument(skip(state))]
pub async fn audit_trail(
    State(state): State<Arc<AppState>>,
    Path(workflow_id): Path<String>,
) -> Result<Json<AuditTrailResponse>, ApiError> {
    let id = WorkflowId::from_string(workflow_id);

    let trail = state
        .registry
        .trail(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Workflow {id} not found")))?;

    Ok(Json(AuditTrailResponse {
        success: true,
        message: "Audit trail fetched successfully".to_string(),
        workflow_id: id.to_string(),
        audit_trail: trail.snapshot(),
    }))
}
