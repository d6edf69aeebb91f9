//! Append-only audit trail for shipment traversals.
//!
//! Every state transition a traversal makes is recorded as an immutable
//! [`AuditEvent`]; the [`AuditTrail`] keeps them in append order and can be
//! snapshotted at any time, including while a traversal is still appending.

pub mod event;
pub mod trail;

pub use event::{AuditEvent, AuditEventKind};
pub use trail::AuditTrail;
