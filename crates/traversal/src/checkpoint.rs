//! Durable checkpoints for resumable traversal.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use audit::AuditEvent;
use common::WorkflowId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::TraversalError;
use crate::route::Route;
use crate::state::TraversalState;

/// Everything needed to resume a traversal without re-executing
/// completed hops: the acquired route, the position counters, and the
/// audit trail recorded so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalCheckpoint {
    pub workflow_id: WorkflowId,
    pub shipment_handle: String,
    pub route: Route,
    pub state: TraversalState,
    pub trail: Vec<AuditEvent>,
}

/// Store for traversal checkpoints.
///
/// The engine persists a checkpoint after every state transition and
/// removes it once the traversal is retired, so recovery replays from the
/// last checkpoint rather than from the start.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Saves a checkpoint, replacing any prior one for the same workflow.
    async fn save(&self, checkpoint: TraversalCheckpoint) -> Result<(), TraversalError>;

    /// Loads the latest checkpoint for a workflow, if any.
    async fn load(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<TraversalCheckpoint>, TraversalError>;

    /// Removes the checkpoint for a retired workflow.
    async fn remove(&self, workflow_id: &WorkflowId) -> Result<(), TraversalError>;
}

/// In-memory checkpoint store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: Arc<RwLock<HashMap<WorkflowId, TraversalCheckpoint>>>,
}

impl InMemoryCheckpointStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored checkpoints.
    pub async fn checkpoint_count(&self) -> usize {
        self.checkpoints.read().await.len()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save(&self, checkpoint: TraversalCheckpoint) -> Result<(), TraversalError> {
        self.checkpoints
            .write()
            .await
            .insert(checkpoint.workflow_id.clone(), checkpoint);
        Ok(())
    }

    async fn load(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<TraversalCheckpoint>, TraversalError> {
        Ok(self.checkpoints.read().await.get(workflow_id).cloned())
    }

    async fn remove(&self, workflow_id: &WorkflowId) -> Result<(), TraversalError> {
        self.checkpoints.write().await.remove(workflow_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ShipmentId;

    fn checkpoint(handle: &str, index: usize) -> TraversalCheckpoint {
        let mut state = TraversalState::new(ShipmentId::new(1));
        for _ in 0..index {
            state.advance();
        }
        TraversalCheckpoint {
            workflow_id: WorkflowId::for_handle(handle),
            shipment_handle: handle.to_string(),
            route: Route::new(vec!["A".into(), "B".into(), "C".into()]).unwrap(),
            state,
            trail: vec![AuditEvent::created(handle)],
        }
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let store = InMemoryCheckpointStore::new();
        store.save(checkpoint("ORDER-001", 1)).await.unwrap();

        let loaded = store
            .load(&WorkflowId::for_handle("ORDER-001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.state.current_index(), 1);
        assert_eq!(loaded.trail.len(), 1);
    }

    #[tokio::test]
    async fn save_replaces_prior_checkpoint() {
        let store = InMemoryCheckpointStore::new();
        store.save(checkpoint("ORDER-001", 0)).await.unwrap();
        store.save(checkpoint("ORDER-001", 2)).await.unwrap();

        assert_eq!(store.checkpoint_count().await, 1);
        let loaded = store
            .load(&WorkflowId::for_handle("ORDER-001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.state.current_index(), 2);
    }

    #[tokio::test]
    async fn remove_retires_the_checkpoint() {
        let store = InMemoryCheckpointStore::new();
        store.save(checkpoint("ORDER-001", 1)).await.unwrap();
        store
            .remove(&WorkflowId::for_handle("ORDER-001"))
            .await
            .unwrap();

        assert!(
            store
                .load(&WorkflowId::for_handle("ORDER-001"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn missing_checkpoint_loads_none() {
        let store = InMemoryCheckpointStore::new();
        assert!(
            store
                .load(&WorkflowId::for_handle("missing"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn checkpoint_serialization_roundtrip() {
        let cp = checkpoint("ORDER-001", 1);
        let json = serde_json::to_string(&cp).unwrap();
        let restored: TraversalCheckpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.workflow_id, cp.workflow_id);
        assert_eq!(restored.state, cp.state);
        assert_eq!(restored.route, cp.route);
    }
}
