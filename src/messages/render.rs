//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{AccountForm, AuthForm, StatusLine, TransactionForm};
use crate::messages::ui_events::{AppTab, InputMode, Screen};
use crate::models::{Account, DashboardData, Transaction, TransactionFilter, User};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub is_loading: bool,
    pub status: Option<StatusLine>,
    pub show_help: bool,

    // Session
    pub user: Option<User>,
    pub auth_form: AuthForm,
    pub auth_error: Option<String>,

    // Accounts
    pub accounts: Vec<Account>,
    pub selected_account: usize,
    pub account_form: Option<AccountForm>,

    // Transactions
    pub transactions: Vec<Transaction>,
    /// Indices into `transactions` that pass the current filter
    pub visible_transactions: Vec<usize>,
    pub selected_transaction: usize,
    pub filter: TransactionFilter,
    pub searching: bool,
    pub transaction_form: Option<TransactionForm>,

    // Dashboard + reports
    pub dashboard: Option<DashboardData>,
    pub scroll: u16,
}
