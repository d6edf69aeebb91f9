//! Registry of traversal runs, addressed by workflow ID.

use std::collections::HashMap;
use std::sync::Arc;

use audit::AuditTrail;
use common::WorkflowId;
use tokio::sync::RwLock;

/// Lifecycle status of one traversal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStatus {
    /// The traversal is still in flight.
    Running,
    /// The traversal reached the final waypoint; carries the completion
    /// message.
    Completed(String),
    /// The traversal failed with a setup error; carries the error message.
    Failed(String),
}

#[derive(Debug, Clone)]
struct WorkflowEntry {
    shipment_handle: String,
    trail: AuditTrail,
    status: WorkflowStatus,
}

/// Tracks running and finished traversals so callers can query results and
/// audit trails by workflow ID.
///
/// Registration enforces the duplicate-run policy: a handle whose workflow
/// is active or already completed is rejected; only a failed run may be
/// started again.
#[derive(Debug, Clone, Default)]
pub struct WorkflowRegistry {
    entries: Arc<RwLock<HashMap<WorkflowId, WorkflowEntry>>>,
}

impl WorkflowRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new run, unless the workflow is active or completed.
    ///
    /// Returns false (and leaves the registry unchanged) when the run is
    /// rejected.
    pub async fn try_register(
        &self,
        workflow_id: WorkflowId,
        shipment_handle: &str,
        trail: AuditTrail,
    ) -> bool {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(&workflow_id)
            && !matches!(existing.status, WorkflowStatus::Failed(_))
        {
            return false;
        }
        entries.insert(
            workflow_id,
            WorkflowEntry {
                shipment_handle: shipment_handle.to_string(),
                trail,
                status: WorkflowStatus::Running,
            },
        );
        true
    }

    /// Records a successful completion.
    pub async fn mark_completed(&self, workflow_id: &WorkflowId, message: String) {
        if let Some(entry) = self.entries.write().await.get_mut(workflow_id) {
            entry.status = WorkflowStatus::Completed(message);
        }
    }

    /// Records a failed run.
    pub async fn mark_failed(&self, workflow_id: &WorkflowId, error: String) {
        if let Some(entry) = self.entries.write().await.get_mut(workflow_id) {
            entry.status = WorkflowStatus::Failed(error);
        }
    }

    /// Returns the status of a run, if known.
    pub async fn status(&self, workflow_id: &WorkflowId) -> Option<WorkflowStatus> {
        self.entries
            .read()
            .await
            .get(workflow_id)
            .map(|e| e.status.clone())
    }

    /// Returns the audit trail handle of a run, if known.
    pub async fn trail(&self, workflow_id: &WorkflowId) -> Option<AuditTrail> {
        self.entries
            .read()
            .await
            .get(workflow_id)
            .map(|e| e.trail.clone())
    }

    /// Returns the shipment handle behind a run, if known.
    pub async fn shipment_handle(&self, workflow_id: &WorkflowId) -> Option<String> {
        self.entries
            .read()
            .await
            .get(workflow_id)
            .map(|e| e.shipment_handle.clone())
    }
}
