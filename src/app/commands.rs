//! Command handlers - business logic for processing UI events
//!
//! Methods that need the network return the commands to send; the actor
//! forwards them. Mutating calls are always followed by a re-fetch of the
//! affected lists, so the rendered data never drifts from the server.

use crate::app::state::{AccountForm, AppState, StatusLine, TransactionForm};
use crate::messages::ui_events::{AppTab, AuthMode, InputMode, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::TypeFilter;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) -> Vec<NetworkCommand> {
        self.active_tab = tab;
        self.scroll = 0;
        self.status = None;
        self.fetch_for_tab(tab)
    }

    /// Fetches the data the given tab renders
    fn fetch_for_tab(&mut self, tab: AppTab) -> Vec<NetworkCommand> {
        match tab {
            AppTab::Dashboard | AppTab::Reports => self.fetch_dashboard(),
            AppTab::Accounts => self.fetch_accounts(),
            AppTab::Transactions => {
                // The ledger needs the accounts list too (transaction form)
                let mut cmds = self.fetch_transactions();
                cmds.extend(self.fetch_accounts());
                cmds
            }
        }
    }

    /// Initial fetch after startup with a hydrated session
    pub fn initial_fetch(&mut self) -> Vec<NetworkCommand> {
        if self.session.is_authenticated() {
            self.fetch_for_tab(self.active_tab)
        } else {
            Vec::new()
        }
    }

    pub fn refresh(&mut self) -> Vec<NetworkCommand> {
        self.fetch_for_tab(self.active_tab)
    }

    pub fn next_item(&mut self) {
        match self.active_tab {
            AppTab::Accounts => {
                if !self.accounts.is_empty() {
                    self.selected_account = (self.selected_account + 1) % self.accounts.len();
                }
            }
            AppTab::Transactions => {
                let visible = self.visible_transactions().len();
                if visible > 0 {
                    self.selected_transaction = (self.selected_transaction + 1) % visible;
                }
            }
            _ => {}
        }
    }

    pub fn prev_item(&mut self) {
        match self.active_tab {
            AppTab::Accounts => {
                if !self.accounts.is_empty() {
                    self.selected_account = self
                        .selected_account
                        .checked_sub(1)
                        .unwrap_or(self.accounts.len() - 1);
                }
            }
            AppTab::Transactions => {
                let visible = self.visible_transactions().len();
                if visible > 0 {
                    self.selected_transaction = self
                        .selected_transaction
                        .checked_sub(1)
                        .unwrap_or(visible - 1);
                }
            }
            _ => {}
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    // ========================
    // Forms
    // ========================

    pub fn open_create_form(&mut self) {
        match self.active_tab {
            AppTab::Accounts => {
                self.account_form = Some(AccountForm::default());
                self.input_mode = InputMode::Editing;
            }
            AppTab::Transactions => {
                if self.accounts.is_empty() {
                    self.status = Some(StatusLine::error("create an account first"));
                    return;
                }
                let mut form = TransactionForm {
                    account_idx: 0,
                    ..TransactionForm::default()
                };
                // Default the transfer target to some other account
                form.transfer_idx = if self.accounts.len() > 1 { 1 } else { 0 };
                self.transaction_form = Some(form);
                self.input_mode = InputMode::Editing;
            }
            _ => {}
        }
    }

    pub fn open_edit_form(&mut self) {
        if self.active_tab != AppTab::Accounts {
            return;
        }
        if let Some(account) = self.accounts.get(self.selected_account) {
            self.account_form = Some(AccountForm::rename(account));
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn form_char(&mut self, c: char) {
        if self.screen == Screen::Auth {
            self.auth_form.error = None;
            self.auth_form.current_input_mut().push(c);
        } else if self.searching {
            self.filter.query.push(c);
            self.selected_transaction = 0;
        } else if let Some(form) = &mut self.account_form {
            form.error = None;
            form.current_input_mut().push(c);
        } else if let Some(form) = &mut self.transaction_form {
            form.error = None;
            match form.field {
                crate::app::state::TxField::Amount => form.amount.push(c),
                crate::app::state::TxField::Description => form.description.push(c),
                _ => {}
            }
        }
    }

    pub fn form_backspace(&mut self) {
        if self.screen == Screen::Auth {
            self.auth_form.current_input_mut().pop();
        } else if self.searching {
            self.filter.query.pop();
            self.selected_transaction = 0;
        } else if let Some(form) = &mut self.account_form {
            form.current_input_mut().pop();
        } else if let Some(form) = &mut self.transaction_form {
            match form.field {
                crate::app::state::TxField::Amount => {
                    form.amount.pop();
                }
                crate::app::state::TxField::Description => {
                    form.description.pop();
                }
                _ => {}
            }
        }
    }

    pub fn form_next_field(&mut self) {
        if self.screen == Screen::Auth {
            self.auth_form.next_field();
        } else if let Some(form) = &mut self.account_form {
            form.next_field();
        } else if let Some(form) = &mut self.transaction_form {
            form.next_field();
        }
    }

    pub fn form_prev_field(&mut self) {
        if self.screen == Screen::Auth {
            self.auth_form.prev_field();
        } else if let Some(form) = &mut self.account_form {
            // Two fields, so previous is the same as next
            form.next_field();
        } else if let Some(form) = &mut self.transaction_form {
            form.prev_field();
        }
    }

    /// Left/Right cycle the choice fields of the transaction form
    pub fn form_cycle(&mut self) {
        let account_count = self.accounts.len();
        if let Some(form) = &mut self.transaction_form {
            match form.field {
                crate::app::state::TxField::Account => {
                    if account_count > 0 {
                        form.account_idx = (form.account_idx + 1) % account_count;
                    }
                }
                crate::app::state::TxField::Kind => {
                    form.kind = form.kind.next();
                }
                crate::app::state::TxField::TransferTo => {
                    if account_count > 0 {
                        form.transfer_idx = (form.transfer_idx + 1) % account_count;
                    }
                }
                _ => {}
            }
        }
    }

    pub fn form_cancel(&mut self) {
        if self.screen == Screen::Auth {
            self.auth_form.error = None;
            return;
        }
        if self.searching {
            self.searching = false;
            self.input_mode = InputMode::Normal;
            return;
        }
        self.account_form = None;
        self.transaction_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_auth_mode(&mut self) {
        if self.screen == Screen::Auth {
            self.auth_form.toggle_mode();
        }
    }

    pub fn form_submit(&mut self) -> Vec<NetworkCommand> {
        if self.screen == Screen::Auth {
            return self.submit_auth();
        }
        if self.searching {
            self.searching = false;
            self.input_mode = InputMode::Normal;
            return Vec::new();
        }
        if self.account_form.is_some() {
            return self.submit_account_form();
        }
        if self.transaction_form.is_some() {
            return self.submit_transaction_form();
        }
        Vec::new()
    }

    fn submit_auth(&mut self) -> Vec<NetworkCommand> {
        if let Err(e) = self.auth_form.validate() {
            self.auth_form.error = Some(e.to_string());
            return Vec::new();
        }
        self.session.login_started();
        let id = self.next_id();
        let cmd = match self.auth_form.mode {
            AuthMode::Login => NetworkCommand::Login {
                id,
                username: self.auth_form.username.trim().to_string(),
                password: self.auth_form.password.clone(),
            },
            AuthMode::Register => NetworkCommand::Register {
                id,
                username: self.auth_form.username.trim().to_string(),
                email: self.auth_form.email.trim().to_string(),
                password: self.auth_form.password.clone(),
            },
        };
        vec![cmd]
    }

    fn submit_account_form(&mut self) -> Vec<NetworkCommand> {
        let Some(form) = &mut self.account_form else {
            return Vec::new();
        };
        let (name, balance) = match form.validate() {
            Ok(parts) => parts,
            Err(e) => {
                form.error = Some(e.to_string());
                return Vec::new();
            }
        };
        let editing = form.editing;
        self.account_form = None;
        self.input_mode = InputMode::Normal;

        let cmds = match (editing, balance) {
            (Some(account_id), _) => self.authed(|id, token| NetworkCommand::RenameAccount {
                id,
                token,
                account_id,
                name,
            }),
            (None, Some(balance)) => self.authed(|id, token| NetworkCommand::CreateAccount {
                id,
                token,
                name,
                balance,
            }),
            (None, None) => Vec::new(),
        };
        if !cmds.is_empty() {
            self.status = Some(StatusLine::info("saving account..."));
        }
        cmds
    }

    fn submit_transaction_form(&mut self) -> Vec<NetworkCommand> {
        let Some(form) = &mut self.transaction_form else {
            return Vec::new();
        };
        let transaction = match form.validate(&self.accounts) {
            Ok(tx) => tx,
            Err(e) => {
                form.error = Some(e.to_string());
                return Vec::new();
            }
        };
        self.transaction_form = None;
        self.input_mode = InputMode::Normal;
        self.status = Some(StatusLine::info("saving transaction..."));
        self.authed(|id, token| NetworkCommand::CreateTransaction {
            id,
            token,
            transaction,
        })
    }

    // ========================
    // Deletion
    // ========================

    pub fn delete_selected(&mut self) -> Vec<NetworkCommand> {
        match self.active_tab {
            AppTab::Accounts => {
                let Some(account) = self.accounts.get(self.selected_account) else {
                    return Vec::new();
                };
                let account_id = account.id;
                self.authed(move |id, token| NetworkCommand::DeleteAccount {
                    id,
                    token,
                    account_id,
                })
            }
            AppTab::Transactions => {
                let visible = self.visible_transactions();
                let Some(&idx) = visible.get(self.selected_transaction) else {
                    return Vec::new();
                };
                let transaction_id = self.transactions[idx].id;
                self.authed(move |id, token| NetworkCommand::DeleteTransaction {
                    id,
                    token,
                    transaction_id,
                })
            }
            _ => Vec::new(),
        }
    }

    // ========================
    // Ledger filters
    // ========================

    pub fn cycle_type_filter(&mut self) {
        if self.active_tab == AppTab::Transactions {
            self.filter.kind = self.filter.kind.next();
            self.selected_transaction = 0;
        }
    }

    pub fn start_search(&mut self) {
        if self.active_tab == AppTab::Transactions {
            self.searching = true;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn clear_search(&mut self) {
        if self.active_tab == AppTab::Transactions {
            self.filter = crate::models::TransactionFilter {
                kind: TypeFilter::All,
                query: String::new(),
            };
            self.selected_transaction = 0;
        }
    }

    // ========================
    // Session
    // ========================

    pub fn logout(&mut self) {
        self.session.logout();
        // Anything still in flight belongs to the old session
        self.stale_before = self.next_request_id;
        self.screen = Screen::Auth;
        self.active_tab = AppTab::Dashboard;
        self.input_mode = InputMode::Normal;
        self.auth_form.clear();
        self.accounts.clear();
        self.selected_account = 0;
        self.transactions.clear();
        self.selected_transaction = 0;
        self.filter = crate::models::TransactionFilter::default();
        self.searching = false;
        self.account_form = None;
        self.transaction_form = None;
        self.dashboard = None;
        self.status = None;
        self.show_help = false;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network responses
    // ========================

    /// Apply a network response; returns follow-up fetches where a mutation
    /// requires the affected lists to be re-read before the view settles.
    /// Responses issued before the last logout are dropped unseen.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        self.inflight = self.inflight.saturating_sub(1);

        if response.id() < self.stale_before {
            return Vec::new();
        }

        match response {
            NetworkResponse::AuthOk { token, user, .. } => {
                if self.session.login_succeeded(token, user).is_ok() {
                    self.screen = Screen::Main;
                    self.active_tab = AppTab::Dashboard;
                    self.auth_form.clear();
                    self.status = None;
                    return self.fetch_dashboard();
                }
                Vec::new()
            }
            NetworkResponse::AuthFailed { message, .. } => {
                self.session.login_failed(message);
                Vec::new()
            }

            NetworkResponse::Accounts { accounts, .. } => {
                self.accounts = accounts;
                if self.selected_account >= self.accounts.len() {
                    self.selected_account = self.accounts.len().saturating_sub(1);
                }
                Vec::new()
            }
            NetworkResponse::AccountCreated { .. } => {
                self.status = Some(StatusLine::info("account created"));
                self.fetch_accounts()
            }
            NetworkResponse::AccountRenamed { .. } => {
                self.status = Some(StatusLine::info("account renamed"));
                self.fetch_accounts()
            }
            NetworkResponse::AccountDeleted { account_id, .. } => {
                // Drop the row immediately; the re-fetch confirms
                self.accounts.retain(|a| a.id != account_id);
                if self.selected_account >= self.accounts.len() {
                    self.selected_account = self.accounts.len().saturating_sub(1);
                }
                self.status = Some(StatusLine::info("account deleted"));
                self.fetch_accounts()
            }

            NetworkResponse::Transactions { transactions, .. } => {
                self.transactions = transactions;
                let visible = self.visible_transactions().len();
                if self.selected_transaction >= visible {
                    self.selected_transaction = visible.saturating_sub(1);
                }
                Vec::new()
            }
            NetworkResponse::TransactionCreated { .. } => {
                self.status = Some(StatusLine::info("transaction created"));
                // Balances moved too, so re-read both lists
                let mut cmds = self.fetch_transactions();
                cmds.extend(self.fetch_accounts());
                cmds
            }
            NetworkResponse::TransactionDeleted { transaction_id, .. } => {
                self.transactions.retain(|t| t.id != transaction_id);
                let visible = self.visible_transactions().len();
                if self.selected_transaction >= visible {
                    self.selected_transaction = visible.saturating_sub(1);
                }
                self.status = Some(StatusLine::info("transaction deleted"));
                let mut cmds = self.fetch_transactions();
                cmds.extend(self.fetch_accounts());
                cmds
            }

            NetworkResponse::Dashboard { data, .. } => {
                self.dashboard = Some(data);
                Vec::new()
            }

            NetworkResponse::Failed { message, .. } => {
                self.status = Some(StatusLine::error(message));
                Vec::new()
            }
        }
    }

    // ========================
    // Fetch command builders
    // ========================

    fn fetch_accounts(&mut self) -> Vec<NetworkCommand> {
        self.authed(|id, token| NetworkCommand::FetchAccounts { id, token })
    }

    fn fetch_transactions(&mut self) -> Vec<NetworkCommand> {
        self.authed(|id, token| NetworkCommand::FetchTransactions {
            id,
            token,
            account_id: None,
        })
    }

    fn fetch_dashboard(&mut self) -> Vec<NetworkCommand> {
        self.authed(|id, token| NetworkCommand::FetchDashboard { id, token })
    }

    /// Build a command carrying the session token, or nothing when logged out
    fn authed<F>(&mut self, build: F) -> Vec<NetworkCommand>
    where
        F: FnOnce(u64, String) -> NetworkCommand,
    {
        let Some(token) = self.session.token().map(str::to_string) else {
            return Vec::new();
        };
        let id = self.next_id();
        vec![build(id, token)]
    }

    /// Bookkeeping for the loading indicator
    pub fn note_sent(&mut self, count: usize) {
        self.inflight += count as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, TransactionType, User};
    use crate::session::SessionStore;
    use crate::storage::TokenStore;

    fn account(id: i64, name: &str) -> Account {
        Account {
            id,
            name: name.to_string(),
            balance: 100.0,
            created_at: "2025-01-01T00:00:00".to_string(),
        }
    }

    fn user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "a@b.c".to_string(),
        }
    }

    fn anonymous_state(dir: &tempfile::TempDir) -> AppState {
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        AppState::new(SessionStore::hydrate(store))
    }

    fn logged_in_state(dir: &tempfile::TempDir) -> AppState {
        let mut state = anonymous_state(dir);
        state.session.login_started();
        state
            .session
            .login_succeeded("tok".to_string(), user())
            .unwrap();
        state.screen = Screen::Main;
        state
    }

    #[test]
    fn auth_submit_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = anonymous_state(&dir);
        state.auth_form.username = "alice".to_string();

        let cmds = state.form_submit();
        assert!(cmds.is_empty());
        assert_eq!(
            state.auth_form.error.as_deref(),
            Some("password is required")
        );
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn auth_submit_emits_login_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = anonymous_state(&dir);
        state.auth_form.username = "alice".to_string();
        state.auth_form.password = "secret".to_string();

        let cmds = state.form_submit();
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], NetworkCommand::Login { .. }));
        assert!(state.session.session().is_loading());
    }

    #[test]
    fn auth_success_switches_screen_and_fetches_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = anonymous_state(&dir);
        state.session.login_started();

        let follow_ups = state.handle_response(NetworkResponse::AuthOk {
            id: 1,
            token: "tok".to_string(),
            user: user(),
        });

        assert_eq!(state.screen, Screen::Main);
        assert!(state.session.is_authenticated());
        assert!(matches!(
            follow_ups.as_slice(),
            [NetworkCommand::FetchDashboard { .. }]
        ));
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        assert_eq!(store.load(), Some("tok".to_string()));
    }

    #[test]
    fn auth_failure_keeps_anonymous_and_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = anonymous_state(&dir);
        state.session.login_started();

        let follow_ups = state.handle_response(NetworkResponse::AuthFailed {
            id: 1,
            message: "username already exists".to_string(),
        });

        assert!(follow_ups.is_empty());
        assert_eq!(state.screen, Screen::Auth);
        assert!(!state.session.is_authenticated());
        assert_eq!(
            state.session.session().error(),
            Some("username already exists")
        );
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn transfer_to_source_account_is_rejected_client_side() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.active_tab = AppTab::Transactions;
        state.accounts = vec![account(1, "Checking"), account(2, "Savings")];
        state.transaction_form = Some(TransactionForm {
            account_idx: 0,
            kind: TransactionType::Transfer,
            amount: "25".to_string(),
            transfer_idx: 0,
            ..TransactionForm::default()
        });

        let cmds = state.form_submit();
        assert!(cmds.is_empty());
        let form = state.transaction_form.as_ref().unwrap();
        assert_eq!(
            form.error.as_deref(),
            Some("please select a different destination account")
        );
    }

    #[test]
    fn valid_transfer_builds_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.accounts = vec![account(1, "Checking"), account(2, "Savings")];
        state.transaction_form = Some(TransactionForm {
            account_idx: 0,
            kind: TransactionType::Transfer,
            amount: "25.50".to_string(),
            transfer_idx: 1,
            ..TransactionForm::default()
        });

        let cmds = state.form_submit();
        match cmds.as_slice() {
            [NetworkCommand::CreateTransaction { transaction, .. }] => {
                assert_eq!(transaction.account_id, 1);
                assert_eq!(transaction.transfer_to_account_id, Some(2));
                assert_eq!(transaction.amount, 25.50);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
        assert!(state.transaction_form.is_none());
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.accounts = vec![account(1, "Checking")];
        state.transaction_form = Some(TransactionForm {
            amount: "abc".to_string(),
            ..TransactionForm::default()
        });

        let cmds = state.form_submit();
        assert!(cmds.is_empty());
        assert!(state.transaction_form.as_ref().unwrap().error.is_some());
    }

    #[test]
    fn deleted_account_is_removed_locally_then_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.active_tab = AppTab::Accounts;
        state.accounts = vec![account(1, "Checking"), account(2, "Savings")];
        state.selected_account = 1;

        let follow_ups = state.handle_response(NetworkResponse::AccountDeleted {
            id: 9,
            account_id: 2,
        });

        assert_eq!(state.accounts.len(), 1);
        assert_eq!(state.accounts[0].id, 1);
        assert_eq!(state.selected_account, 0);
        assert!(matches!(
            follow_ups.as_slice(),
            [NetworkCommand::FetchAccounts { .. }]
        ));
    }

    #[test]
    fn mutating_transaction_refetches_both_lists() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);

        let follow_ups = state.handle_response(NetworkResponse::TransactionCreated { id: 4 });
        assert_eq!(follow_ups.len(), 2);
        assert!(matches!(
            follow_ups[0],
            NetworkCommand::FetchTransactions { .. }
        ));
        assert!(matches!(follow_ups[1], NetworkCommand::FetchAccounts { .. }));
    }

    #[test]
    fn failed_request_sets_status_and_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.accounts = vec![account(1, "Checking")];

        let follow_ups = state.handle_response(NetworkResponse::Failed {
            id: 3,
            message: "insufficient funds".to_string(),
        });

        assert!(follow_ups.is_empty());
        assert_eq!(state.accounts.len(), 1);
        let status = state.status.as_ref().unwrap();
        assert!(status.is_error);
        assert_eq!(status.message, "insufficient funds");
    }

    #[test]
    fn logout_clears_session_and_returns_to_auth_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.accounts = vec![account(1, "Checking")];

        state.logout();

        assert_eq!(state.screen, Screen::Auth);
        assert!(!state.session.is_authenticated());
        assert!(state.accounts.is_empty());
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn late_auth_response_after_logout_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = anonymous_state(&dir);
        state.auth_form.username = "alice".to_string();
        state.auth_form.password = "secret".to_string();
        let cmds = state.form_submit();
        let NetworkCommand::Login { id, .. } = &cmds[0] else {
            panic!("expected a login command");
        };

        let id = *id;
        state.logout();
        let follow_ups = state.handle_response(NetworkResponse::AuthOk {
            id,
            token: "tok".to_string(),
            user: user(),
        });

        assert!(follow_ups.is_empty());
        assert_eq!(state.screen, Screen::Auth);
        assert!(!state.session.is_authenticated());
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn late_data_response_after_logout_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        let cmds = state.refresh();
        let NetworkCommand::FetchDashboard { id, .. } = &cmds[0] else {
            panic!("expected a dashboard fetch");
        };

        let id = *id;
        state.logout();
        let follow_ups = state.handle_response(NetworkResponse::Accounts {
            id,
            accounts: vec![account(1, "Checking")],
        });

        assert!(follow_ups.is_empty());
        assert!(state.accounts.is_empty());
    }

    #[test]
    fn logged_out_state_emits_no_fetches() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = anonymous_state(&dir);
        assert!(state.refresh().is_empty());
        assert!(state.initial_fetch().is_empty());
    }

    #[test]
    fn search_and_type_filter_narrow_the_visible_ledger() {
        use crate::models::Transaction;

        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in_state(&dir);
        state.active_tab = AppTab::Transactions;
        state.transactions = vec![
            Transaction {
                id: 1,
                account_id: 1,
                kind: TransactionType::Expense,
                amount: 800.0,
                description: "Rent payment".to_string(),
                transfer_to_account_id: None,
                created_at: "2025-02-01T00:00:00".to_string(),
                account_name: "Checking".to_string(),
                transfer_to_account_name: None,
            },
            Transaction {
                id: 2,
                account_id: 1,
                kind: TransactionType::Income,
                amount: 50.0,
                description: "Rent refund".to_string(),
                transfer_to_account_id: None,
                created_at: "2025-02-02T00:00:00".to_string(),
                account_name: "Checking".to_string(),
                transfer_to_account_name: None,
            },
        ];

        state.cycle_type_filter(); // all -> income
        state.cycle_type_filter(); // income -> expense
        state.start_search();
        for c in "rent".chars() {
            state.form_char(c);
        }
        state.form_submit(); // end search

        assert_eq!(state.visible_transactions(), vec![0]);
        assert_eq!(state.input_mode, InputMode::Normal);
    }
}
