use serde::{Deserialize, Serialize};

/// Opaque identifier for a shipment record.
///
/// Assigned once by the external shipment service when the record is
/// created and never changed afterwards. Wrapping the raw value prevents
/// mixing shipment ids up with other numeric identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(i64);

impl ShipmentId {
    /// Creates a shipment ID from the raw value assigned by the service.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ShipmentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ShipmentId> for i64 {
    fn from(id: ShipmentId) -> Self {
        id.0
    }
}

/// Identifier addressing one traversal run.
///
/// Derived deterministically from the shipment handle so that submitting
/// the same handle twice addresses the same run instead of starting a
/// second concurrent traversal for the same shipment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Derives the workflow ID for a shipment handle.
    pub fn for_handle(handle: &str) -> Self {
        Self(format!("shipment-{handle}"))
    }

    /// Creates a workflow ID from an already-derived string.
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipment_id_preserves_value() {
        let id = ShipmentId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn shipment_id_serialization_roundtrip() {
        let id = ShipmentId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: ShipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn workflow_id_is_deterministic() {
        let a = WorkflowId::for_handle("ORDER-001");
        let b = WorkflowId::for_handle("ORDER-001");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "shipment-ORDER-001");
    }

    #[test]
    fn distinct_handles_get_distinct_workflow_ids() {
        assert_ne!(
            WorkflowId::for_handle("ORDER-001"),
            WorkflowId::for_handle("ORDER-002")
        );
    }
}
