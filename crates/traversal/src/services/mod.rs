//! External collaborator traits and in-memory implementations.

pub mod carrier;
pub mod reset;
pub mod routing;

pub use carrier::{CarrierService, InMemoryCarrierService};
pub use reset::{InMemoryResetService, ResetService};
pub use routing::{InMemoryRoutingService, RoutingService};
