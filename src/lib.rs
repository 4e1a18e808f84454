//! # Tally TUI
//!
//! A terminal client for a personal finance tracker REST API.
//!
//! ## Features
//! - Login / register with bearer-token sessions persisted across restarts
//! - Accounts view: create, rename, delete
//! - Transaction ledger with type filter and free-text search
//! - Dashboard and monthly income/expense reports
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod session;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use error::{ApiError, ValidationError};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Account, DashboardData, MonthlySummary, Transaction, TransactionType, User};
pub use network::NetworkActor;
pub use session::{Session, SessionStore};
pub use storage::TokenStore;
