//! Audit event types and convenience constructors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of transition an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    /// Shipment record created; always the first event of a trail.
    Created,

    /// A forward hop completed successfully.
    Moved,

    /// A forward hop exhausted its retry budget.
    Failed,

    /// A completed hop was rolled back after a later failure.
    Compensated,

    /// The shipment reached the final waypoint (terminal event).
    Completed,
}

impl AuditEventKind {
    /// Returns the kind name as recorded on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::Created => "CREATED",
            AuditEventKind::Moved => "MOVED",
            AuditEventKind::Failed => "FAILED",
            AuditEventKind::Compensated => "COMPENSATED",
            AuditEventKind::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable, timestamped record of one traversal state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What kind of transition this event records.
    pub kind: AuditEventKind,

    /// Human-readable description of the transition.
    pub message: String,

    /// Source waypoint, where applicable.
    pub from: Option<String>,

    /// Destination waypoint, where applicable.
    pub to: Option<String>,

    /// Why the transition happened (FAILED / COMPENSATED only).
    pub reason: Option<String>,

    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

// Convenience constructors
impl AuditEvent {
    /// Creates a CREATED event for a new shipment.
    pub fn created(shipment_handle: &str) -> Self {
        Self {
            kind: AuditEventKind::Created,
            message: format!("Shipment '{shipment_handle}' created"),
            from: None,
            to: None,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a MOVED event for a successful forward hop.
    pub fn moved(from: &str, to: &str) -> Self {
        Self {
            kind: AuditEventKind::Moved,
            message: format!("Moved from {from} to {to}"),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a FAILED event for a hop that exhausted its retry budget.
    pub fn failed(from: &str, to: &str, reason: impl Into<String>) -> Self {
        Self {
            kind: AuditEventKind::Failed,
            message: format!("Failed to move from {from} to {to}"),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            reason: Some(reason.into()),
            timestamp: Utc::now(),
        }
    }

    /// Creates a COMPENSATED event for a rolled-back hop.
    pub fn compensated(from: &str, to: &str, reason: impl Into<String>) -> Self {
        Self {
            kind: AuditEventKind::Compensated,
            message: format!("Compensated: rolled back from {from} to {to}"),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            reason: Some(reason.into()),
            timestamp: Utc::now(),
        }
    }

    /// Creates a COMPLETED event once the final waypoint is reached.
    pub fn completed(origin: &str, destination: &str) -> Self {
        Self {
            kind: AuditEventKind::Completed,
            message: format!("Shipment completed from {origin} to {destination}"),
            from: Some(origin.to_string()),
            to: Some(destination.to_string()),
            reason: None,
            timestamp: Utc::now(),
        }
    }
}
