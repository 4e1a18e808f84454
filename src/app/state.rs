//! App state - pure data structure; network I/O lives in the network actor

use crate::error::ValidationError;
use crate::messages::ui_events::{AppTab, AuthMode, InputMode, Screen};
use crate::messages::RenderState;
use crate::models::{
    Account, DashboardData, NewTransaction, Transaction, TransactionFilter, TransactionType,
};
use crate::session::SessionStore;

/// One-line feedback shown in the status bar
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub message: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        StatusLine {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StatusLine {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Focused field of the auth form
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum AuthField {
    #[default]
    Username,
    Email,
    Password,
}

/// Login/register form
#[derive(Clone, Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub field: AuthField,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.field = AuthField::Username;
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.field = match (self.field, self.mode) {
            (AuthField::Username, AuthMode::Register) => AuthField::Email,
            (AuthField::Username, AuthMode::Login) => AuthField::Password,
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Username,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match (self.field, self.mode) {
            (AuthField::Username, _) => AuthField::Password,
            (AuthField::Email, _) => AuthField::Username,
            (AuthField::Password, AuthMode::Register) => AuthField::Email,
            (AuthField::Password, AuthMode::Login) => AuthField::Username,
        };
    }

    pub fn current_input_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    /// Reject empty required fields before any request is built
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField("username"));
        }
        if self.mode == AuthMode::Register && self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = AuthForm {
            mode: self.mode,
            ..AuthForm::default()
        };
    }
}

/// Focused field of the account form
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum AccountField {
    #[default]
    Name,
    Balance,
}

/// Create/rename form for accounts. When `editing` is set this is a rename
/// and the balance field is ignored (balance is immutable post-creation).
#[derive(Clone, Debug, Default)]
pub struct AccountForm {
    pub name: String,
    pub balance: String,
    pub field: AccountField,
    pub editing: Option<i64>,
    pub error: Option<String>,
}

impl AccountForm {
    pub fn rename(account: &Account) -> Self {
        AccountForm {
            name: account.name.clone(),
            editing: Some(account.id),
            ..AccountForm::default()
        }
    }

    pub fn is_rename(&self) -> bool {
        self.editing.is_some()
    }

    pub fn next_field(&mut self) {
        if !self.is_rename() {
            self.field = match self.field {
                AccountField::Name => AccountField::Balance,
                AccountField::Balance => AccountField::Name,
            };
        }
    }

    pub fn current_input_mut(&mut self) -> &mut String {
        match self.field {
            AccountField::Name => &mut self.name,
            AccountField::Balance => &mut self.balance,
        }
    }

    /// Validated (name, opening balance); balance is `None` for a rename
    pub fn validate(&self) -> Result<(String, Option<f64>), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.is_rename() {
            return Ok((name.to_string(), None));
        }
        let balance: f64 = self
            .balance
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidAmount)?;
        if balance < 0.0 || !balance.is_finite() {
            return Err(ValidationError::InvalidAmount);
        }
        Ok((name.to_string(), Some(balance)))
    }
}

/// Focused field of the transaction form
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TxField {
    #[default]
    Account,
    Kind,
    Amount,
    Description,
    TransferTo,
}

/// Create form for transactions. Account choices are indices into the
/// accounts list current at the time the form was opened.
#[derive(Clone, Debug)]
pub struct TransactionForm {
    pub account_idx: usize,
    pub kind: TransactionType,
    pub amount: String,
    pub description: String,
    pub transfer_idx: usize,
    pub field: TxField,
    pub error: Option<String>,
}

impl Default for TransactionForm {
    fn default() -> Self {
        TransactionForm {
            account_idx: 0,
            kind: TransactionType::Expense,
            amount: String::new(),
            description: String::new(),
            transfer_idx: 0,
            field: TxField::default(),
            error: None,
        }
    }
}

impl TransactionForm {
    pub fn next_field(&mut self) {
        self.field = match self.field {
            TxField::Account => TxField::Kind,
            TxField::Kind => TxField::Amount,
            TxField::Amount => TxField::Description,
            TxField::Description if self.kind == TransactionType::Transfer => TxField::TransferTo,
            TxField::Description => TxField::Account,
            TxField::TransferTo => TxField::Account,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            TxField::Account if self.kind == TransactionType::Transfer => TxField::TransferTo,
            TxField::Account => TxField::Description,
            TxField::Kind => TxField::Account,
            TxField::Amount => TxField::Kind,
            TxField::Description => TxField::Amount,
            TxField::TransferTo => TxField::Description,
        };
    }

    /// Build the request body, or reject the form without sending anything
    pub fn validate(&self, accounts: &[Account]) -> Result<NewTransaction, ValidationError> {
        let account = accounts
            .get(self.account_idx)
            .ok_or(ValidationError::MissingAccount)?;
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidAmount)?;
        if amount <= 0.0 || !amount.is_finite() {
            return Err(ValidationError::InvalidAmount);
        }

        let transfer_to_account_id = if self.kind == TransactionType::Transfer {
            let target = accounts
                .get(self.transfer_idx)
                .ok_or(ValidationError::MissingAccount)?;
            if target.id == account.id {
                return Err(ValidationError::SameTransferAccount);
            }
            Some(target.id)
        } else {
            None
        };

        Ok(NewTransaction {
            account_id: account.id,
            kind: self.kind,
            amount,
            description: self.description.trim().to_string(),
            transfer_to_account_id,
        })
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub active_tab: AppTab,
    pub input_mode: InputMode,

    // Session (dependency-injected, owns token persistence)
    pub session: SessionStore,
    pub auth_form: AuthForm,

    // Accounts view
    pub accounts: Vec<Account>,
    pub selected_account: usize,
    pub account_form: Option<AccountForm>,

    // Transactions view
    pub transactions: Vec<Transaction>,
    /// Selection index into the filtered view of the ledger
    pub selected_transaction: usize,
    pub filter: TransactionFilter,
    pub searching: bool,
    pub transaction_form: Option<TransactionForm>,

    // Dashboard + reports
    pub dashboard: Option<DashboardData>,
    pub scroll: u16,

    // Request bookkeeping
    pub inflight: u32,
    pub next_request_id: u64,
    /// Responses with an id below this belong to a previous session and
    /// are dropped; bumped on logout
    pub stale_before: u64,

    pub status: Option<StatusLine>,
    pub show_help: bool,
}

impl AppState {
    pub fn new(session: SessionStore) -> Self {
        let screen = if session.is_authenticated() {
            Screen::Main
        } else {
            Screen::Auth
        };
        AppState {
            screen,
            active_tab: AppTab::Dashboard,
            input_mode: InputMode::Normal,
            session,
            auth_form: AuthForm::default(),
            accounts: Vec::new(),
            selected_account: 0,
            account_form: None,
            transactions: Vec::new(),
            selected_transaction: 0,
            filter: TransactionFilter::default(),
            searching: false,
            transaction_form: None,
            dashboard: None,
            scroll: 0,
            inflight: 0,
            next_request_id: 1,
            stale_before: 0,
            status: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_loading(&self) -> bool {
        self.inflight > 0 || self.session.session().is_loading()
    }

    /// Indices of ledger entries that pass the current filter
    pub fn visible_transactions(&self) -> Vec<usize> {
        self.filter.apply(&self.transactions)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            is_loading: self.is_loading(),
            status: self.status.clone(),
            show_help: self.show_help,
            user: self.session.user().cloned(),
            auth_form: self.auth_form.clone(),
            auth_error: self.session.session().error().map(str::to_string),
            accounts: self.accounts.clone(),
            selected_account: self.selected_account,
            account_form: self.account_form.clone(),
            transactions: self.transactions.clone(),
            visible_transactions: self.visible_transactions(),
            selected_transaction: self.selected_transaction,
            filter: self.filter.clone(),
            searching: self.searching,
            transaction_form: self.transaction_form.clone(),
            dashboard: self.dashboard.clone(),
            scroll: self.scroll,
        }
    }
}
