//! Network layer - async API execution

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
