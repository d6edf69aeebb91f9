pub mod types;

pub use types::{ShipmentId, WorkflowId};
