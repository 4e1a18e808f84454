//! App layer - central state machine

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::AppActor;
pub use state::AppState;
